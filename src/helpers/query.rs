/// Builds an upstream query string, dropping parameters that are absent or
/// empty instead of forwarding them as `key=`.
pub fn compact_query<'a, I>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    params
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some((key.to_owned(), v.to_owned())),
            _ => None,
        })
        .collect()
}
