//! Host node-lifecycle hooks and the comparison extension that plugs into them.
//!
//! The host owns a [`HookRegistry`] and grants subscriptions per node type.
//! Observers for a node type run in subscription order; a failing observer is
//! logged and does not stop the ones after it.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    foundation::error::{CompareError, CompareResult},
    handles::ViewHandles,
    message::ExecutionMessage,
    opts::ViewOpts,
    telemetry::{Level, Telemetry},
    view::ComparisonView,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub trait NodeObserver {
    fn node_created(&mut self, node: NodeId) -> CompareResult<()>;

    fn executed(&mut self, node: NodeId, message: &ExecutionMessage) -> CompareResult<()>;

    fn node_removed(&mut self, _node: NodeId) {}
}

impl<T: NodeObserver> NodeObserver for Rc<RefCell<T>> {
    fn node_created(&mut self, node: NodeId) -> CompareResult<()> {
        self.borrow_mut().node_created(node)
    }

    fn executed(&mut self, node: NodeId, message: &ExecutionMessage) -> CompareResult<()> {
        self.borrow_mut().executed(node, message)
    }

    fn node_removed(&mut self, node: NodeId) {
        self.borrow_mut().node_removed(node)
    }
}

struct Subscriber {
    id: SubscriptionId,
    observer: Box<dyn NodeObserver>,
}

#[derive(Default)]
pub struct HookRegistry {
    next_id: u64,
    by_type: BTreeMap<String, Vec<Subscriber>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        node_type: &str,
        observer: Box<dyn NodeObserver>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.by_type
            .entry(node_type.to_string())
            .or_default()
            .push(Subscriber { id, observer });
        id
    }

    /// Revoke a subscription. Returns `false` if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subs in self.by_type.values_mut() {
            if let Some(pos) = subs.iter().position(|s| s.id == id) {
                subs.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, node_type: &str) -> usize {
        self.by_type.get(node_type).map_or(0, Vec::len)
    }

    /// Run creation hooks; returns the errors observers reported.
    pub fn node_created(&mut self, node_type: &str, node: NodeId) -> Vec<CompareError> {
        self.dispatch(node_type, "node_created", |obs| obs.node_created(node))
    }

    /// Route an execution result to the observers of `node_type`.
    pub fn executed(
        &mut self,
        node_type: &str,
        node: NodeId,
        message: &ExecutionMessage,
    ) -> Vec<CompareError> {
        self.dispatch(node_type, "executed", |obs| obs.executed(node, message))
    }

    pub fn node_removed(&mut self, node_type: &str, node: NodeId) {
        if let Some(subs) = self.by_type.get_mut(node_type) {
            for sub in subs.iter_mut() {
                sub.observer.node_removed(node);
            }
        }
    }

    fn dispatch(
        &mut self,
        node_type: &str,
        hook: &'static str,
        mut f: impl FnMut(&mut dyn NodeObserver) -> CompareResult<()>,
    ) -> Vec<CompareError> {
        let Some(subs) = self.by_type.get_mut(node_type) else {
            return Vec::new();
        };
        let mut errors = Vec::new();
        for sub in subs.iter_mut() {
            if let Err(err) = f(sub.observer.as_mut()) {
                tracing::error!(hook, node_type, subscription = sub.id.0, %err, "observer failed");
                errors.push(err);
            }
        }
        errors
    }
}

/// Builds the visual elements for a freshly created node.
pub type HandleFactory = Box<dyn FnMut(NodeId) -> CompareResult<ViewHandles>>;

/// One [`ComparisonView`] per node of the comparison node type.
pub struct CompareExtension {
    opts: ViewOpts,
    factory: HandleFactory,
    telemetry: Rc<dyn Telemetry>,
    views: BTreeMap<NodeId, ComparisonView>,
}

impl CompareExtension {
    pub fn new(opts: ViewOpts, factory: HandleFactory, telemetry: Rc<dyn Telemetry>) -> Self {
        Self {
            opts,
            factory,
            telemetry,
            views: BTreeMap::new(),
        }
    }

    /// Subscribe a shared extension to `registry` under the configured node type.
    pub fn register(
        registry: &mut HookRegistry,
        ext: Rc<RefCell<Self>>,
    ) -> SubscriptionId {
        let node_type = ext.borrow().opts.node_type.clone();
        registry.subscribe(&node_type, Box::new(ext))
    }

    pub fn opts(&self) -> &ViewOpts {
        &self.opts
    }

    pub fn view(&self, node: NodeId) -> Option<&ComparisonView> {
        self.views.get(&node)
    }

    pub fn view_mut(&mut self, node: NodeId) -> Option<&mut ComparisonView> {
        self.views.get_mut(&node)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl NodeObserver for CompareExtension {
    fn node_created(&mut self, node: NodeId) -> CompareResult<()> {
        let mut view = ComparisonView::with_opts(self.opts.clone(), self.telemetry.clone());
        match (self.factory)(node) {
            Ok(handles) => view.attach(handles),
            Err(err) => {
                // Keep the view so later updates report the missing elements.
                self.views.insert(node, view);
                return Err(err);
            }
        }
        self.telemetry
            .emit(Level::Info, "node.created", &[("node", node.0.to_string())]);
        self.views.insert(node, view);
        Ok(())
    }

    fn executed(&mut self, node: NodeId, message: &ExecutionMessage) -> CompareResult<()> {
        let Some(view) = self.views.get_mut(&node) else {
            return Err(CompareError::missing_elements(format!(
                "no view for node {}",
                node.0
            )));
        };
        view.on_executed(message).map(|_| ())
    }

    fn node_removed(&mut self, node: NodeId) {
        if self.views.remove(&node).is_some() {
            self.telemetry
                .emit(Level::Debug, "node.removed", &[("node", node.0.to_string())]);
        }
    }
}
