pub const NAMESPACE_SEP: char = ':';

pub fn namespaced(plugin: &str, skill: &str) -> String {
    format!("{plugin}{NAMESPACE_SEP}{skill}")
}

pub fn parse(name: &str) -> Option<(&str, &str)> {
    name.split_once(NAMESPACE_SEP)
}

pub fn is_namespaced(name: &str) -> bool {
    name.contains(NAMESPACE_SEP)
}
