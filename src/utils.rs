//! List and string helpers shared by the plotting and analysis code
//!
//! These are small, allocation-light routines for building column headers,
//! matching file names against substring filters and picking labels out of
//! decorated strings.

use serde_json::Value;
use std::str::FromStr;

/// Whether every substring or at least one substring must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every substring must match
    #[default]
    All,
    /// At least one substring must match
    Any,
}

impl FromStr for MatchMode {
    type Err = std::convert::Infallible;

    /// Only `"all"` selects [`MatchMode::All`]; every other value means any.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::Any)
        }
    }
}

/// Performs elementwise concatenation of two lists.
///
/// With `list2_are_units` each element becomes `"a (b)"`, which is the form
/// used for column headers (quantity followed by its unit). Returns `None`
/// when the lists differ in length.
pub fn add_lists_elementwise<A, B>(
    list1: &[A],
    list2: &[B],
    list2_are_units: bool,
) -> Option<Vec<String>>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if list1.len() != list2.len() {
        return None;
    }

    let combined = list1
        .iter()
        .zip(list2)
        .map(|(a, b)| {
            if list2_are_units {
                format!("{} ({})", a.as_ref(), b.as_ref())
            } else {
                format!("{}{}", a.as_ref(), b.as_ref())
            }
        })
        .collect();

    Some(combined)
}

/// Checks that a JSON value is an array whose elements are all arrays.
pub fn check_is_list_of_lists(data: &Value) -> bool {
    match data {
        Value::Array(items) => items.iter().all(Value::is_array),
        _ => false,
    }
}

/// Checks whether all (or any) of `substrings` occur in at least one element of `list`.
pub fn check_substrings_in_list<S, L>(substrings: &[S], list: &[L], mode: MatchMode) -> bool
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let found = |substring: &S| {
        list.iter()
            .any(|element| element.as_ref().contains(substring.as_ref()))
    };

    match mode {
        MatchMode::All => substrings.iter().all(found),
        MatchMode::Any => substrings.iter().any(found),
    }
}

/// Checks whether all (or any) of `substrings` occur in `string`.
pub fn check_substrings_in_string<S: AsRef<str>>(
    substrings: &[S],
    string: &str,
    mode: MatchMode,
) -> bool {
    match mode {
        MatchMode::All => substrings.iter().all(|s| string.contains(s.as_ref())),
        MatchMode::Any => substrings.iter().any(|s| string.contains(s.as_ref())),
    }
}

/// Returns the text between the first `start_char` and the first `end_char` after it.
///
/// # Examples
///
/// ```
/// use ehc_tools::utils::find_between_chars;
///
/// assert_eq!(find_between_chars("a[b]c", '[', ']'), Some("b"));
/// assert_eq!(find_between_chars("abc", '[', ']'), None);
/// ```
pub fn find_between_chars(text: &str, start_char: char, end_char: char) -> Option<&str> {
    let start_index = text.find(start_char)?;
    let after_start = start_index + start_char.len_utf8();
    let end_offset = text[after_start..].find(end_char)?;
    Some(&text[after_start..after_start + end_offset])
}

/// Builds a new list, replacing the elements that satisfy `condition`.
pub fn modify_list_based_on_condition<T, C, F>(
    original_list: &[T],
    condition: C,
    new_value_function: F,
) -> Vec<T>
where
    T: Clone,
    C: Fn(&T) -> bool,
    F: Fn(&T) -> T,
{
    original_list
        .iter()
        .map(|element| {
            if condition(element) {
                new_value_function(element)
            } else {
                element.clone()
            }
        })
        .collect()
}

/// Replaces every parenthesised span, parentheses included, with `replacement`.
///
/// A span runs from an opening `(` to the next `)`. An unmatched `(` is kept.
pub fn replace_inside_parentheses(text: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close_offset) => {
                result.push_str(&rest[..open]);
                result.push_str(replacement);
                rest = &rest[open + close_offset + 1..];
            }
            None => break,
        }
    }

    result.push_str(rest);
    result
}
