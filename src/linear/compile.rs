//! Folds an instruction list into an immutable template chain.

use std::rc::Rc;

use tracing::debug;

use crate::builder::BuildError;
use crate::linear::instruction::Instruction;
use crate::linear::machine::Template;
use crate::linear::node::{Arm, Link, Node, NodeKind};
use crate::linear::vars::SlotId;

/// Compile an ordered instruction list into a [`Template`].
///
/// The list is folded right to left, seeded with the end state, so every
/// node is born pointing at its successor and the chain never needs
/// patching. `elif`/`else_run` arms accumulate during the fold and are
/// consumed by the nearest preceding `run_if`; an arm that reaches any other
/// instruction (or the front of the list) belongs to nothing and fails the
/// build.
pub fn compile(instructions: Vec<Instruction>) -> Result<Template, BuildError> {
    let mut link = Link::End;
    let mut nodes = 0usize;
    let mut pending: Vec<Arm> = Vec::new();

    for instruction in instructions.into_iter().rev() {
        if !pending.is_empty()
            && !matches!(
                instruction,
                Instruction::RunIf { .. } | Instruction::ElseIf { .. } | Instruction::Else { .. }
            )
        {
            return Err(BuildError::DanglingBranch);
        }

        let kind = match instruction {
            Instruction::ElseIf { cond, then } => {
                pending.push(Arm {
                    cond: Some(cond),
                    body: then,
                });
                continue;
            }
            Instruction::Else { then } => {
                pending.push(Arm {
                    cond: None,
                    body: then,
                });
                continue;
            }
            Instruction::RunIf { cond, then } => {
                let mut arms = vec![Arm {
                    cond: Some(cond),
                    body: then,
                }];
                arms.extend(pending.drain(..).rev());
                NodeKind::Branch {
                    arms,
                    slot: SlotId::next(),
                }
            }
            Instruction::Task(task) => NodeKind::Task(task),
            Instruction::WaitMillis(millis) => NodeKind::WaitMillis {
                millis,
                slot: SlotId::next(),
            },
            Instruction::WaitUntil(pred) => NodeKind::WaitUntil(pred),
            Instruction::RunMachine(template) => NodeKind::RunMachine {
                template,
                slot: SlotId::next(),
            },
            Instruction::LoopWhile { cond, body } => NodeKind::LoopWhile {
                cond,
                body,
                slot: SlotId::next(),
            },
            Instruction::LoopTask { cond, action } => NodeKind::LoopTask { cond, action },
            Instruction::Launch { template, handle } => NodeKind::Launch {
                template,
                slot: handle.slot(),
            },
            Instruction::Await(handle) => NodeKind::Await {
                slot: handle.slot(),
            },
        };

        link = Link::Node(Rc::new(Node { kind, next: link }));
        nodes += 1;
    }

    if !pending.is_empty() {
        return Err(BuildError::DanglingBranch);
    }

    let template = Template::new(link, nodes);
    debug!(template = %template.id(), nodes, "linear template compiled");
    Ok(template)
}
