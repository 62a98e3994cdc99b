use std::collections::HashMap;

use crate::api::BindError;

/// Split a field tag into ordered `(key, value)` pairs.
///
/// Pairs are separated by `,` and a key is separated from its value by the first `=`.
/// Values may be single-quoted to contain `,` (ex: `help='a, b'`).
/// Spaces inside keys are dropped, while values are kept as written.
/// A repeated key keeps its first position and its last value.
/// ```
/// # use argot_builder::parse_tag;
/// assert_eq!(
///     parse_tag("required,short=n,help='first, last'"),
///     vec![
///         ("required".to_string(), "".to_string()),
///         ("short".to_string(), "n".to_string()),
///         ("help".to_string(), "first, last".to_string()),
///     ],
/// );
/// ```
pub fn parse_tag(tag: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::default();
    let mut key = String::default();
    let mut value = String::default();
    let mut in_key = true;
    let mut in_quote = false;

    fn insert(pairs: &mut Vec<(String, String)>, key: &mut String, value: &mut String) {
        let key = std::mem::take(key);
        let value = std::mem::take(value);

        if key.is_empty() {
            return;
        }

        match pairs.iter_mut().find(|(existing, _)| existing == &key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key, value)),
        }
    }

    for c in tag.chars() {
        if in_key {
            match c {
                ',' => insert(&mut pairs, &mut key, &mut value),
                '=' => in_key = false,
                ' ' => {}
                _ => key.push(c),
            }
        } else if in_quote {
            match c {
                '\'' => in_quote = false,
                _ => value.push(c),
            }
        } else {
            match c {
                ',' => {
                    insert(&mut pairs, &mut key, &mut value);
                    in_key = true;
                }
                '\'' => in_quote = true,
                _ => value.push(c),
            }
        }
    }

    insert(&mut pairs, &mut key, &mut value);
    pairs
}

/// The interpreted tag of one field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Tags {
    pub(crate) exclude: bool,
    pub(crate) required: bool,
    pub(crate) name: Option<String>,
    pub(crate) short: Option<char>,
    pub(crate) placeholder: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) hide_default: bool,
    pub(crate) hidden: bool,
    pub(crate) append: bool,
    pub(crate) args: bool,
    pub(crate) embed: bool,
}

const SHAPING_KEYS: [&str; 11] = [
    "required",
    "name",
    "short",
    "placeholder",
    "env",
    "help",
    "default",
    "nodefault",
    "hidden",
    "append",
    "args",
];

// Keys that mean nothing for a positional argument field.
const FLAG_ONLY_KEYS: [&str; 6] = ["required", "short", "env", "hidden", "default", "nodefault"];

impl Tags {
    pub(crate) fn parse(field: &str, tag: &str) -> Result<Self, BindError> {
        let mut pairs: HashMap<String, String> = parse_tag(tag).into_iter().collect();

        if pairs.remove("-").is_some() {
            let mut keys: Vec<String> = pairs
                .into_keys()
                .filter(|key| key != "embed" && !SHAPING_KEYS.contains(&key.as_str()))
                .collect();

            if !keys.is_empty() {
                keys.sort();
                return Err(BindError::UnknownTags {
                    field: field.to_string(),
                    keys,
                });
            }

            return Ok(Tags {
                exclude: true,
                ..Tags::default()
            });
        }

        let embed = pairs.contains_key("embed");

        if embed {
            if let Some(other) = SHAPING_KEYS.iter().find(|key| pairs.contains_key(**key)) {
                return Err(BindError::ConflictingTags {
                    field: field.to_string(),
                    left: "embed",
                    right: *other,
                });
            }
        }

        if pairs.contains_key("args") {
            if let Some(other) = FLAG_ONLY_KEYS.iter().find(|key| pairs.contains_key(**key)) {
                return Err(BindError::ConflictingTags {
                    field: field.to_string(),
                    left: "args",
                    right: *other,
                });
            }
        }

        let non_empty = |value: String| (!value.is_empty()).then_some(value);
        let tags = Tags {
            exclude: false,
            required: pairs.remove("required").is_some(),
            name: pairs.remove("name").and_then(non_empty),
            short: None,
            placeholder: pairs.remove("placeholder").and_then(non_empty),
            env: pairs.remove("env").and_then(non_empty),
            help: pairs.remove("help").and_then(non_empty),
            default: pairs.remove("default"),
            hide_default: pairs.remove("nodefault").is_some(),
            hidden: pairs.remove("hidden").is_some(),
            append: pairs.remove("append").is_some(),
            args: pairs.remove("args").is_some(),
            embed: pairs.remove("embed").is_some(),
        };
        let short = pairs.remove("short");

        if !pairs.is_empty() {
            let mut keys: Vec<String> = pairs.into_keys().collect();
            keys.sort();
            return Err(BindError::UnknownTags {
                field: field.to_string(),
                keys,
            });
        }

        let short = match short {
            None => None,
            Some(short) => {
                let mut chars = short.chars();

                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(BindError::InvalidShortName {
                            field: field.to_string(),
                            short,
                        })
                    }
                }
            }
        };

        if tags.hide_default && tags.default.as_ref().is_some_and(|d| !d.is_empty()) {
            return Err(BindError::ConflictingTags {
                field: field.to_string(),
                left: "default",
                right: "nodefault",
            });
        }

        if tags.append && tags.args {
            return Err(BindError::ConflictingTags {
                field: field.to_string(),
                left: "append",
                right: "args",
            });
        }

        // An empty `default=` hides the rendered initial value.
        let hide_default = tags.hide_default || tags.default.as_deref() == Some("");
        let default = tags.default.filter(|d| !d.is_empty());

        Ok(Tags {
            short,
            hide_default,
            default,
            ..tags
        })
    }
}
