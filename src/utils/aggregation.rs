use std::collections::HashMap;
use std::hash::Hash;

/// Group items by key, keeping groups in order of first appearance.
pub fn group_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&idx) => groups[idx].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Count items by key, keeping keys in order of first appearance.
pub fn count_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Vec<(K, usize)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    group_by(items, key)
        .into_iter()
        .map(|(k, group)| (k, group.len()))
        .collect()
}

/// Largest value, skipping missing ones. `None` for an empty input.
pub fn max_present<I>(values: I) -> Option<u64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    values.into_iter().flatten().max()
}
