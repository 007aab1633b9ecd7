/// Find all local maxima
///
/// Index `i` is a maximum when neither neighbour exceeds it and it is not
/// the middle of a flat run. Signals shorter than three samples have none.
pub fn local_maxima(data: &[f64]) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }

    data.windows(3)
        .enumerate()
        .filter_map(|(i, w)| {
            let (prev, curr, next) = (w[0], w[1], w[2]);
            let is_peak = prev <= curr && next <= curr;
            let is_plateau = prev == curr && next == curr;
            (is_peak && !is_plateau).then_some(i + 1)
        })
        .collect()
}

/// Find all local minima (maxima of the negated signal)
pub fn local_minima(data: &[f64]) -> Vec<usize> {
    let negated: Vec<f64> = data.iter().map(|v| -v).collect();
    local_maxima(&negated)
}

/// Find local maxima over a neighbourhood of `order` samples on each side
///
/// Index `i` with `order <= i < len - order` is a maximum when no sample in
/// `[i - order, i + order]` exceeds it. Plateaus are not collapsed, so a flat
/// top yields every index along it.
pub fn local_maxima_ord(data: &[f64], order: usize) -> Vec<usize> {
    let order = order.max(1);
    if data.len() < order * 2 {
        return Vec::new();
    }

    (order..data.len() - order)
        .filter(|&i| {
            let window = &data[i - order..=i + order];
            window.iter().all(|&v| v <= data[i])
        })
        .collect()
}
