//! Usage paths and their canonical keys
//!
//! A path is the sequence of BOM positions walked from the root. Each step
//! records the nominal link of the position and which alternative was
//! followed. The canonical key joins one identifier per level with `-`:
//! `u<id>` for a followed nominal link, `s<id>` for a followed substitute.

use serde::{Deserialize, Serialize};

use crate::entities::part::{PartLink, PartSubstituteLink};

const SEPARATOR: &str = "-";

/// Which alternative of a BOM position is followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkChoice {
    Nominal,
    /// Index into the nominal link's substitutes
    Substitute(usize),
}

/// One level of a path
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub link: PartLink,
    pub choice: LinkChoice,
}

impl PathStep {
    pub fn nominal(link: PartLink) -> Self {
        Self {
            link,
            choice: LinkChoice::Nominal,
        }
    }

    pub fn with_choice(&self, choice: LinkChoice) -> Self {
        Self {
            link: self.link.clone(),
            choice,
        }
    }

    /// The substitute followed at this step, if any
    pub fn substitute(&self) -> Option<&PartSubstituteLink> {
        match self.choice {
            LinkChoice::Nominal => None,
            LinkChoice::Substitute(idx) => self.link.substitutes.get(idx),
        }
    }

    /// Number of the part this step leads to
    pub fn target(&self) -> &str {
        match self.substitute() {
            Some(sub) => &sub.substitute,
            None => &self.link.component,
        }
    }

    pub fn amount(&self) -> f64 {
        match self.substitute() {
            Some(sub) => sub.amount,
            None => self.link.amount,
        }
    }

    /// Level identifier used in path keys
    pub fn full_id(&self) -> String {
        match self.substitute() {
            Some(sub) => format!("s{}", sub.id),
            None => format!("u{}", self.link.id),
        }
    }
}

/// Canonical key of a whole path
pub fn path_key(path: &[PathStep]) -> String {
    let ids: Vec<String> = path.iter().map(PathStep::full_id).collect();
    ids.join(SEPARATOR)
}

/// Key of `prefix` extended by one more level identifier
pub fn extend_key(prefix: &str, full_id: &str) -> String {
    if prefix.is_empty() {
        full_id.to_string()
    } else {
        format!("{}{}{}", prefix, SEPARATOR, full_id)
    }
}

/// Key of the path's last position for every alternative it offers
///
/// Returns the nominal key first, then one key per substitute in declared
/// order. An empty path has no alternatives.
pub fn alternative_keys(path: &[PathStep]) -> Vec<(LinkChoice, String)> {
    let Some((last, prefix)) = path.split_last() else {
        return Vec::new();
    };
    let prefix_key = path_key(prefix);
    let mut keys = vec![(
        LinkChoice::Nominal,
        extend_key(&prefix_key, &last.with_choice(LinkChoice::Nominal).full_id()),
    )];
    for idx in 0..last.link.substitutes.len() {
        let choice = LinkChoice::Substitute(idx);
        keys.push((choice, extend_key(&prefix_key, &last.with_choice(choice).full_id())));
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u64, target: &str) -> PathStep {
        PathStep::nominal(PartLink::new(id, target, 1.0))
    }

    #[test]
    fn test_path_key_joins_levels() {
        let path = vec![step(1, "A"), step(5, "B")];
        assert_eq!(path_key(&path), "u1-u5");
        assert_eq!(path_key(&[]), "");
    }

    #[test]
    fn test_substitute_step_uses_substitute_id_and_target() {
        let link = PartLink::new(3, "NOMINAL", 2.0).with_substitute(30, "ALT", 4.0);
        let sub = PathStep {
            link,
            choice: LinkChoice::Substitute(0),
        };
        assert_eq!(sub.full_id(), "s30");
        assert_eq!(sub.target(), "ALT");
        assert_eq!(sub.amount(), 4.0);
    }

    #[test]
    fn test_alternative_keys_keep_prefix() {
        let link = PartLink::new(3, "NOMINAL", 1.0)
            .with_substitute(30, "ALT1", 1.0)
            .with_substitute(31, "ALT2", 1.0);
        let path = vec![step(1, "A"), PathStep::nominal(link)];
        let keys: Vec<String> = alternative_keys(&path).into_iter().map(|(_, k)| k).collect();
        assert_eq!(keys, vec!["u1-u3", "u1-s30", "u1-s31"]);
    }
}
