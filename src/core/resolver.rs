//! Structure resolver - walks a product structure under a configuration spec
//!
//! The walk is depth-first over the usage links of each resolved iteration,
//! driven by an explicit stack of frames so structure depth is bounded by
//! memory rather than the thread stack. Two pieces of bookkeeping are kept
//! apart:
//! - the set of part numbers on the current branch, used for cycle detection
//!   (a part reached twice through different branches is a legal diamond, a
//!   part reached again below itself is a cycle);
//! - a per-call cache of fetched part masters, so a part shared by several
//!   branches is looked up once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::callbacks::ResolveCallbacks;
use crate::core::component::Component;
use crate::core::error::ResolveError;
use crate::core::lookup::PartMasterLookup;
use crate::core::path::{path_key, LinkChoice, PathStep};
use crate::core::spec::{ConfigSpec, IterationSelection, LinkSelection};
use crate::entities::part::{PartIterationKey, PartLink, PartMaster};

/// Resolves product structures read from a part lookup
pub struct StructureResolver<'l, L: PartMasterLookup + ?Sized> {
    lookup: &'l L,
}

impl<'l, L: PartMasterLookup + ?Sized> StructureResolver<'l, L> {
    pub fn new(lookup: &'l L) -> Self {
        Self { lookup }
    }

    /// Resolve the structure below `root_number`
    ///
    /// `depth_limit` bounds how many levels below the root are walked (`None`
    /// walks everything). Returns `Ok(None)` when the root itself resolves to
    /// no iteration and the callbacks let that pass.
    pub fn resolve<S, C>(
        &self,
        workspace_id: &str,
        spec: &mut S,
        root_number: &str,
        depth_limit: Option<usize>,
        callbacks: &mut C,
    ) -> Result<Option<Component>, ResolveError>
    where
        S: ConfigSpec + ?Sized,
        C: ResolveCallbacks + ?Sized,
    {
        let mut walk = Walk {
            lookup: self.lookup,
            workspace_id,
            spec,
            callbacks,
            depth_limit,
            cache: HashMap::new(),
            ancestors: HashSet::new(),
            path: Vec::new(),
            parts: Vec::new(),
        };

        let root = walk.fetch(root_number)?;
        walk.ancestors.insert(root_number.to_string());
        let component = walk.run(root)?;

        info!(
            root = root_number,
            policy = walk.spec.kind(),
            nodes = component.as_ref().map_or(0, Component::node_count),
            lookups = walk.cache.len(),
            "resolved product structure"
        );
        Ok(component)
    }
}

/// A resolved node whose links are still being walked
struct Frame {
    master: Arc<PartMaster>,
    key: PartIterationKey,
    amount: f64,
    path: String,
    /// Links to walk; empty when descent stops at this node
    links: Vec<PartLink>,
    next_link: usize,
    /// Alternatives of the current link not yet walked
    pending: Option<std::vec::IntoIter<LinkChoice>>,
    children: Vec<Component>,
}

impl Frame {
    fn into_component(self) -> Component {
        Component {
            part_master: self.master,
            retained_iteration: self.key,
            path: self.path,
            amount: self.amount,
            children: self.children,
        }
    }
}

/// State of one resolve call
struct Walk<'a, L: ?Sized, S: ?Sized, C: ?Sized> {
    lookup: &'a L,
    workspace_id: &'a str,
    spec: &'a mut S,
    callbacks: &'a mut C,
    depth_limit: Option<usize>,
    /// Fetched masters by part number; one workspace per call
    cache: HashMap<String, Arc<PartMaster>>,
    /// Part numbers on the current branch
    ancestors: HashSet<String>,
    path: Vec<PathStep>,
    /// Iterations retained along the current branch, root first
    parts: Vec<PartIterationKey>,
}

impl<L, S, C> Walk<'_, L, S, C>
where
    L: PartMasterLookup + ?Sized,
    S: ConfigSpec + ?Sized,
    C: ResolveCallbacks + ?Sized,
{
    fn fetch(&mut self, number: &str) -> Result<Arc<PartMaster>, ResolveError> {
        if let Some(master) = self.cache.get(number) {
            return Ok(Arc::clone(master));
        }
        let master = self.lookup.part_master(self.workspace_id, number)?;
        self.cache.insert(number.to_string(), Arc::clone(&master));
        Ok(master)
    }

    fn check_cycle(&self, target: &str) -> Result<(), ResolveError> {
        if self.ancestors.contains(target) {
            return Err(ResolveError::CyclicStructure {
                number: target.to_string(),
                path: path_key(&self.path),
            });
        }
        Ok(())
    }

    /// Accept an iteration chosen by the callbacks
    fn adopt(
        &mut self,
        master: &PartMaster,
        key: PartIterationKey,
    ) -> Result<PartIterationKey, ResolveError> {
        if master.iteration(&key).is_none() {
            return Err(ResolveError::UnknownIteration {
                number: master.number.clone(),
                key,
            });
        }
        self.spec.retained_mut().retain_iteration(key.clone());
        Ok(key)
    }

    fn select_iteration(
        &mut self,
        master: &PartMaster,
    ) -> Result<Option<PartIterationKey>, ResolveError> {
        let chosen = match self.spec.filter_part_iteration(master) {
            IterationSelection::Resolved(found) => return Ok(Some(found.key())),
            IterationSelection::Indeterminate(candidates) => {
                debug!(part = %master.number, candidates = candidates.len(), "indeterminate version");
                self.callbacks
                    .on_indeterminate_version(master, &candidates)?
            }
            IterationSelection::Unresolved => {
                debug!(part = %master.number, "unresolved version");
                self.callbacks.on_unresolved_version(master)?
            }
        };
        chosen.map(|key| self.adopt(master, key)).transpose()
    }

    /// Drive the walk from the root until its frame completes
    fn run(&mut self, root: Arc<PartMaster>) -> Result<Option<Component>, ResolveError> {
        let Some(frame) = self.enter(root, 1.0)? else {
            return Ok(None);
        };
        let mut stack = vec![frame];

        while let Some(top) = stack.last_mut() {
            if let Some((master, amount)) = self.next_target(top)? {
                let number = master.number.clone();
                match self.enter(master, amount)? {
                    Some(child) => stack.push(child),
                    None => {
                        self.ancestors.remove(&number);
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            self.parts.pop();
            self.ancestors.remove(&done.master.number);
            let component = done.into_component();
            match stack.last_mut() {
                Some(parent) => parent.children.push(component),
                None => return Ok(Some(component)),
            }
        }
        Ok(None)
    }

    /// Resolve a node reached through the current path
    fn enter(
        &mut self,
        master: Arc<PartMaster>,
        amount: f64,
    ) -> Result<Option<Frame>, ResolveError> {
        let Some(key) = self.select_iteration(&master)? else {
            return Ok(None);
        };
        let iteration = master
            .iteration(&key)
            .ok_or_else(|| ResolveError::UnknownIteration {
                number: master.number.clone(),
                key: key.clone(),
            })?
            .iteration;

        self.parts.push(key.clone());
        let within_depth = self.depth_limit.map_or(true, |limit| self.path.len() < limit);
        let descend = self.callbacks.on_path_walk(&self.path, &self.parts)? && within_depth;
        let links = if descend {
            iteration.components.clone()
        } else {
            Vec::new()
        };

        Ok(Some(Frame {
            path: path_key(&self.path),
            master,
            key,
            amount,
            links,
            next_link: 0,
            pending: None,
            children: Vec::new(),
        }))
    }

    /// Advance `frame` to the next alternative to walk
    ///
    /// On `Some`, the last path step points at the returned part and its
    /// number is on the ancestor set.
    fn next_target(
        &mut self,
        frame: &mut Frame,
    ) -> Result<Option<(Arc<PartMaster>, f64)>, ResolveError> {
        loop {
            if let Some(pending) = frame.pending.as_mut() {
                if let Some(choice) = pending.next() {
                    let Some(step) = self.path.last_mut() else {
                        return Ok(None);
                    };
                    step.choice = choice;
                    let target = step.target().to_string();
                    let amount = step.amount();

                    self.check_cycle(&target)?;
                    let master = self.fetch(&target)?;
                    self.ancestors.insert(target);
                    return Ok(Some((master, amount)));
                }
                frame.pending = None;
                self.path.pop();
                continue;
            }

            let Some(link) = frame.links.get(frame.next_link) else {
                return Ok(None);
            };
            frame.next_link += 1;
            let choices = self.select_link(link)?;
            frame.pending = Some(choices.into_iter());
        }
    }

    /// Push a step for `link` and decide which alternatives to walk
    fn select_link(&mut self, link: &PartLink) -> Result<Vec<LinkChoice>, ResolveError> {
        self.path.push(PathStep::nominal(link.clone()));
        self.check_cycle(&link.component)?;

        let choices = match self.spec.filter_part_link(&self.path) {
            LinkSelection::Pruned => {
                if link.optional {
                    debug!(path = %path_key(&self.path), "optional link pruned");
                } else {
                    self.callbacks.on_unresolved_path(&self.path, &self.parts)?;
                }
                Vec::new()
            }
            LinkSelection::Selected(choice) => {
                if link.optional {
                    self.callbacks.on_optional_path(&self.path, &self.parts)?;
                }
                vec![choice]
            }
            LinkSelection::Candidates(choices) => {
                self.callbacks
                    .on_indeterminate_path(&self.path, &self.parts)?;
                if link.optional {
                    self.callbacks.on_optional_path(&self.path, &self.parts)?;
                }
                choices
            }
        };
        Ok(choices)
    }
}
