//! Transition engine for compiled chain nodes.
//!
//! Nodes are immutable and shared between instances; everything a node
//! mutates lives in the calling instance's [`VarStore`]. One call to
//! [`advance`] performs exactly one local transition, except that launch
//! nodes register their child and fall through to the next node within the
//! same call.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;
use uuid::Uuid;

use crate::concurrent::Ticker;
use crate::linear::instruction::{Predicate, TaskFn};
use crate::linear::machine::Template;
use crate::linear::vars::{SlotId, SlotValue, VarStore};

/// A compiled chain position: either a shared node or the end state.
#[derive(Clone)]
pub(crate) enum Link {
    Node(Rc<Node>),
    End,
}

impl Link {
    pub(crate) fn is_end(&self) -> bool {
        matches!(self, Link::End)
    }
}

/// One compiled instruction plus the link it transitions to.
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) next: Link,
}

/// One conditional arm of a branch node. `cond` of `None` always matches.
pub(crate) struct Arm {
    pub(crate) cond: Option<Predicate>,
    pub(crate) body: Template,
}

pub(crate) enum NodeKind {
    Task(TaskFn),
    WaitMillis { millis: u64, slot: SlotId },
    WaitUntil(Predicate),
    RunMachine { template: Template, slot: SlotId },
    LoopWhile { cond: Predicate, body: Template, slot: SlotId },
    LoopTask { cond: Predicate, action: TaskFn },
    Branch { arms: Vec<Arm>, slot: SlotId },
    Launch { template: Template, slot: SlotId },
    Await { slot: SlotId },
}

/// Run the node under `cursor` once and return the next cursor position.
///
/// Launch nodes register a fresh clone of their template on `ticker`,
/// record its finished flag under the handle's slot, and continue with the
/// following node in the same call, so a run of consecutive launches plus
/// one ordinary node all happen on a single tick.
pub(crate) fn advance(
    instance: Uuid,
    cursor: &Link,
    vars: &mut VarStore,
    ticker: &mut Ticker,
) -> Link {
    let mut cursor = cursor.clone();
    loop {
        let node = match &cursor {
            Link::End => return Link::End,
            Link::Node(node) => Rc::clone(node),
        };
        let stay = || Link::Node(Rc::clone(&node));

        match &node.kind {
            NodeKind::Launch { template, slot } => {
                let child = template.create_new();
                let flag = Rc::new(Cell::new(false));
                vars.set(*slot, SlotValue::Launched(Rc::clone(&flag)));
                trace!(parent = %instance, child = %child.instance_id(), "child launched");
                ticker.add_watched(Box::new(child), flag);
                cursor = node.next.clone();
            }
            NodeKind::Task(task) => {
                task();
                return node.next.clone();
            }
            NodeKind::WaitMillis { millis, slot } => {
                return match vars.wait_start(*slot) {
                    None => {
                        vars.set(*slot, SlotValue::Started(Instant::now()));
                        stay()
                    }
                    Some(start) => {
                        if start.elapsed() >= Duration::from_millis(*millis) {
                            vars.remove(*slot);
                            node.next.clone()
                        } else {
                            stay()
                        }
                    }
                };
            }
            NodeKind::WaitUntil(pred) => {
                return if pred() { node.next.clone() } else { stay() };
            }
            NodeKind::RunMachine { template, slot } => {
                return match vars.take_running(*slot) {
                    None => {
                        vars.set(*slot, SlotValue::Running(Box::new(template.create_new())));
                        stay()
                    }
                    Some(mut sub) => {
                        sub.update();
                        if sub.is_finished() {
                            node.next.clone()
                        } else {
                            vars.set(*slot, SlotValue::Running(sub));
                            stay()
                        }
                    }
                };
            }
            NodeKind::LoopWhile { cond, body, slot } => {
                return match vars.take_running(*slot) {
                    None => {
                        if cond() {
                            vars.set(*slot, SlotValue::Running(Box::new(body.create_new())));
                            stay()
                        } else {
                            node.next.clone()
                        }
                    }
                    Some(mut iteration) => {
                        iteration.update();
                        if !iteration.is_finished() {
                            vars.set(*slot, SlotValue::Running(iteration));
                            stay()
                        } else if cond() {
                            vars.set(*slot, SlotValue::Running(Box::new(body.create_new())));
                            stay()
                        } else {
                            node.next.clone()
                        }
                    }
                };
            }
            NodeKind::LoopTask { cond, action } => {
                return if cond() {
                    action();
                    stay()
                } else {
                    node.next.clone()
                };
            }
            NodeKind::Branch { arms, slot } => {
                return match vars.take_running(*slot) {
                    None => {
                        // Conditions are read once, on entry; a live arm is
                        // driven to completion even if they shift afterwards.
                        let chosen = arms
                            .iter()
                            .find(|arm| arm.cond.as_ref().map_or(true, |cond| cond()));
                        match chosen {
                            Some(arm) => {
                                vars.set(
                                    *slot,
                                    SlotValue::Running(Box::new(arm.body.create_new())),
                                );
                                stay()
                            }
                            None => node.next.clone(),
                        }
                    }
                    Some(mut chosen) => {
                        chosen.update();
                        if chosen.is_finished() {
                            node.next.clone()
                        } else {
                            vars.set(*slot, SlotValue::Running(chosen));
                            stay()
                        }
                    }
                };
            }
            NodeKind::Await { slot } => {
                return if vars.launched_flag(*slot).is_some_and(|flag| flag.get()) {
                    node.next.clone()
                } else {
                    stay()
                };
            }
        }
    }
}
