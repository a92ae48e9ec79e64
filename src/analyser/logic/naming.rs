//! Header normalisation.
//!
//! Headers are rewritten to `snake_case`, except where a [`RenameRule`]
//! names the header explicitly.

use super::types::RenameRule;
use crate::error::{Result, ScrubError};
use polars::prelude::*;
use std::collections::HashMap;

/// Converts a `CamelCase` or space separated header to `snake_case`.
///
/// An underscore goes before every uppercase letter that starts a new word
/// (an uppercase letter followed by a lowercase one), unless it is the
/// first character or already follows a separator. The result is lower-cased
/// and spaces become underscores.
pub fn normalize_column_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        let starts_word = i > 0
            && c.is_uppercase()
            && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
        if starts_word && !out.ends_with(['_', ' ']) {
            out.push('_');
        }
        out.push(c);
    }

    out.to_lowercase().replace(' ', "_")
}

fn find_rule<'a>(rules: &'a [RenameRule], name: &str) -> Option<&'a RenameRule> {
    rules.iter().find(|rule| rule.source == name)
}

/// Computes the final header list, in input order.
///
/// A header matching a rule's source takes the rule's target verbatim; all
/// others are normalised. The rules are then applied once more, in order,
/// to the resulting names so a normalised name equal to some rule's source
/// still ends up at that rule's target.
///
/// # Errors
///
/// Returns [`ScrubError::SchemaConflict`] when two headers end up with the
/// same name.
pub fn normalize_column_names(names: &[String], rules: &[RenameRule]) -> Result<Vec<String>> {
    let mut renamed: Vec<String> = names
        .iter()
        .map(|name| match find_rule(rules, name) {
            Some(rule) => rule.target.clone(),
            None => normalize_column_name(name),
        })
        .collect();

    for rule in rules {
        for name in renamed.iter_mut().filter(|n| **n == rule.source) {
            name.clone_from(&rule.target);
        }
    }

    check_unique(names, &renamed)?;
    Ok(renamed)
}

fn check_unique(original: &[String], renamed: &[String]) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in renamed.iter().enumerate() {
        if let Some(&first) = seen.get(name.as_str()) {
            let columns = renamed
                .iter()
                .zip(original)
                .skip(first)
                .filter(|(r, _)| *r == name)
                .map(|(_, o)| o.clone())
                .collect();
            return Err(ScrubError::SchemaConflict {
                name: name.clone(),
                columns,
            });
        }
        seen.insert(name.as_str(), idx);
    }
    Ok(())
}

/// Renames the table's columns according to [`normalize_column_names`].
///
/// # Errors
///
/// Returns [`ScrubError::SchemaConflict`] on colliding names.
pub fn normalize_schema(df: &DataFrame, rules: &[RenameRule]) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    let renamed = normalize_column_names(&names, rules)?;

    for (old, new) in names.iter().zip(&renamed).filter(|(o, n)| o != n) {
        tracing::debug!("Renamed column '{old}' -> '{new}'");
    }

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(&renamed)
        .map(|(column, name)| {
            let mut column = column.clone();
            column.rename(name.as_str().into());
            column
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
