use log::warn;
use regex::Regex;

pub use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
};

/// `value | regex('pattern')`: whether the value matches. An invalid pattern
/// never matches.
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// `items | join_names`: a human list such as `a, b and c`.
pub fn join_names(items: Vec<String>) -> String {
    match items.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
