use super::{DataRange, Draft};
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::debug;

/// Gives every task except `Start` at least one incoming link, drawn from a
/// random task with a smaller index.
pub fn ensure_incoming(draft: &mut Draft, data: DataRange, rng: &mut StdRng) {
    for task in 1..draft.task_count {
        if !draft.incoming[task].is_empty() {
            continue;
        }
        let source = rng.gen_range(0..task);
        draft.link(source, task, data.full(rng));
        debug!(task, source, "repaired missing incoming link");
    }
}

/// Marks `from` and every task that can reach it through existing links.
fn mark_reaching(draft: &Draft, reaches_end: &mut [bool], from: usize) {
    reaches_end[from] = true;
    let mut queue = VecDeque::from([from]);
    while let Some(task) = queue.pop_front() {
        for &source in &draft.incoming[task] {
            if !reaches_end[source] {
                reaches_end[source] = true;
                queue.push_back(source);
            }
        }
    }
}

/// Gives every task a path to `End`.
///
/// Tasks are visited from the highest index down, so every candidate target
/// with a higher index already reaches `End`. A task without outgoing links
/// (and one in five others) is linked straight to `End`; the rest link to a
/// random higher-index task that reaches `End` and is not yet a successor.
pub fn ensure_reaches_end(draft: &mut Draft, data: DataRange, rng: &mut StdRng) {
    let end = draft.end();
    let mut reaches_end = vec![false; draft.task_count];
    mark_reaching(draft, &mut reaches_end, end);

    for task in (0..end).rev() {
        if reaches_end[task] {
            continue;
        }

        let target = if draft.outgoing[task].is_empty() || rng.gen_bool(0.2) {
            end
        } else {
            let candidates: Vec<usize> = (task + 1..end)
                .filter(|&candidate| reaches_end[candidate] && !draft.has_link(task, candidate))
                .collect();
            if candidates.is_empty() {
                end
            } else {
                candidates[rng.gen_range(0..candidates.len())]
            }
        };

        draft.link(task, target, data.half(rng));
        mark_reaching(draft, &mut reaches_end, task);
        debug!(task, target, "repaired missing path to end");
    }
}
