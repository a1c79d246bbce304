use super::{DataRange, Draft};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Wires each layer to the one before it.
///
/// The task at position `k` of a layer is fed by position `k mod width` of the
/// previous layer. When the previous layer has more than one task a second,
/// lighter feed from a different task is added with probability
/// `0.2 + 0.3 * connectivity`.
pub fn add_primary_links(
    draft: &mut Draft,
    layers: &[Vec<usize>],
    connectivity: f64,
    data: DataRange,
    rng: &mut StdRng,
) {
    let secondary_probability = 0.2 + 0.3 * connectivity;

    for pair in layers.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        for (position, &target) in current.iter().enumerate() {
            let primary = position % previous.len();
            draft.link(previous[primary], target, data.full(rng));

            if previous.len() > 1 && rng.gen_bool(secondary_probability) {
                // draw among the other positions of the previous layer
                let mut second = rng.gen_range(0..previous.len() - 1);
                if second >= primary {
                    second += 1;
                }
                draft.link(previous[second], target, data.half(rng));
            }
        }
    }

    for pair in layers.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        for &target in current {
            if draft.incoming[target].is_empty() {
                if let Some(&source) = previous.choose(rng) {
                    draft.link(source, target, data.full(rng));
                }
            }
        }
    }
}

/// Adds links that jump over at least one layer. Skip distances run from 2 up
/// to `1 + floor(2 * connectivity)`, each taken with probability
/// `0.3 * connectivity / skip`. `End` is never targeted here.
pub fn add_skip_links(
    draft: &mut Draft,
    layers: &[Vec<usize>],
    connectivity: f64,
    data: DataRange,
    rng: &mut StdRng,
) {
    let last = layers.len() - 1;
    let end = draft.end();
    let max_skip = 1 + (2.0 * connectivity) as usize;
    let skip_probability = 0.3 * connectivity;

    for source_layer in 0..layers.len().saturating_sub(2) {
        for skip in 2..=max_skip.min(last - source_layer) {
            let targets = &layers[source_layer + skip];
            let probability = skip_probability / skip as f64;
            for &source in &layers[source_layer] {
                if !rng.gen_bool(probability) {
                    continue;
                }
                let Some(&target) = targets.choose(rng) else {
                    continue;
                };
                if target != end && !draft.has_link(source, target) {
                    draft.link(source, target, data.half(rng));
                }
            }
        }
    }
}

/// Feeds `End` from the whole second-to-last layer, plus a few shuffled
/// interior tasks (`max(1, floor(n / 10 * connectivity) + 1)` of them).
pub fn add_sink_links(
    draft: &mut Draft,
    layers: &[Vec<usize>],
    connectivity: f64,
    data: DataRange,
    rng: &mut StdRng,
) {
    let last = layers.len() - 1;
    let end = draft.end();

    for &task in &layers[last - 1] {
        if !draft.has_link(task, end) {
            draft.link(task, end, data.full(rng));
        }
    }

    if layers.len() <= 3 {
        return;
    }
    let extra = (((draft.task_count / 10) as f64 * connectivity) as usize + 1).max(1);
    let mut candidates: Vec<usize> = layers[1..last - 1].iter().flatten().copied().collect();
    candidates.shuffle(rng);
    for &task in candidates.iter().take(extra) {
        if !draft.has_link(task, end) {
            draft.link(task, end, data.third(rng));
        }
    }
}
