//! Automatic binarisation of grayscale rasters.

/// Computes Otsu's threshold for an 8-bit grayscale buffer.
///
/// Returns the level `t` that maximises the between-class variance of the split
/// `v <= t` / `v > t`, or `None` when the buffer has fewer than two distinct levels.
pub fn otsu_threshold(pixels: &[u8]) -> Option<u8> {
    let mut histogram = [0u64; 256];
    for &p in pixels {
        histogram[p as usize] += 1;
    }

    let total = pixels.len() as f64;
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0.0;
    let mut background_sum = 0.0;
    let mut best: Option<(u8, f64)> = None;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count as f64;
        if background_weight == 0.0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0.0 {
            break;
        }
        background_sum += level as f64 * count as f64;

        let background_mean = background_sum / background_weight;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight;
        let diff = background_mean - foreground_mean;
        let variance = background_weight * foreground_weight * diff * diff;

        if best.is_none_or(|(_, v)| variance > v) {
            best = Some((level as u8, variance));
        }
    }

    best.map(|(level, _)| level)
}
