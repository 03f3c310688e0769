// 📊 Aggregates over record collections
// Empty input never yields NaN: mean and sum are 0, extremes are None.

/// Arithmetic mean of a numeric attribute, `0.0` for an empty collection
pub fn mean<'a, T, I, F>(items: I, accessor: F) -> f64
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    let (total, count) = items
        .into_iter()
        .fold((0.0, 0usize), |(total, count), item| (total + accessor(item), count + 1));

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub fn sum<'a, T, I, F>(items: I, accessor: F) -> f64
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    items.into_iter().map(accessor).sum()
}

/// Largest value of the attribute, `None` when empty
pub fn max_of<'a, T, I, F>(items: I, accessor: F) -> Option<f64>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    items.into_iter().map(accessor).reduce(f64::max)
}

pub fn min_of<'a, T, I, F>(items: I, accessor: F) -> Option<f64>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    items.into_iter().map(accessor).reduce(f64::min)
}
