use rand::Rng;
use rand::rngs::StdRng;

/// Layer-count and width adjustment derived from connectivity: sparse
/// workflows get an extra, narrower layer, dense ones one fewer, wider layer.
pub fn layer_bias(connectivity: f64) -> i64 {
    if connectivity > 0.5 {
        -1
    } else if connectivity < 0.2 {
        1
    } else {
        0
    }
}

/// Planned number of layers, `Start` and `End` included.
pub fn planned_layer_count(task_count: usize, connectivity: f64) -> usize {
    let root = (task_count as f64).sqrt() as i64;
    (2 * root + layer_bias(connectivity)).max(4) as usize
}

/// Maximum number of tasks drawn for one interior layer.
pub fn layer_width_cap(task_count: usize, connectivity: f64) -> usize {
    let root = (task_count as f64).sqrt() as i64;
    (root / 2 - layer_bias(connectivity)).max(2) as usize
}

/// Sizes of the interior layers. Earlier layers are filled first; tasks left
/// over once every layer has been drawn are spilled one per layer from the
/// middle layer forward, then from the middle backward, until none remain.
/// Trailing layers that received no task are dropped.
pub fn interior_layer_sizes(task_count: usize, connectivity: f64, rng: &mut StdRng) -> Vec<usize> {
    let interior = planned_layer_count(task_count, connectivity) - 2;
    let cap = layer_width_cap(task_count, connectivity);
    let mut remaining = task_count.saturating_sub(2);
    let mut sizes = vec![0usize; interior];

    for size in sizes.iter_mut() {
        if remaining == 0 {
            break;
        }
        let width = (1 + rng.gen_range(0..cap)).min(remaining);
        *size = width;
        remaining -= width;
    }

    let middle = (interior + 2) / 2 - 1;
    let spill_order: Vec<usize> = (middle..interior).chain((0..middle).rev()).collect();
    while remaining > 0 {
        for &layer in &spill_order {
            if remaining == 0 {
                break;
            }
            sizes[layer] += 1;
            remaining -= 1;
        }
    }

    sizes.retain(|&size| size > 0);
    sizes
}

/// Assigns task indices layer by layer: `Start` (0) alone first, the interior
/// layers in order, `End` (`task_count - 1`) alone last.
pub fn build_layers(task_count: usize, connectivity: f64, rng: &mut StdRng) -> Vec<Vec<usize>> {
    let sizes = interior_layer_sizes(task_count, connectivity, rng);
    let mut layers = Vec::with_capacity(sizes.len() + 2);
    layers.push(vec![0]);

    let mut next = 1;
    for size in sizes {
        layers.push((next..next + size).collect());
        next += size;
    }

    layers.push(vec![task_count - 1]);
    layers
}
