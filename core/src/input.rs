use std::collections::HashMap;

use crate::error::ValidationError;
use crate::model::tags::Tags;
use crate::model::task::TaskDraft;
use crate::time::parse_human_date;

pub const DRAFT_KEYS: [&str; 5] = ["status", "priority", "due", "description", "tags"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub title: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `Write spec pri:high tags:work,urgent` into the free words and the
/// `key:value` pairs.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut title_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        title_parts.push(arg.as_str());
    }

    ParsedInput {
        title: title_parts.join(" "),
        metadata,
    }
}

/// Resolves a key or a unique prefix of one.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, ValidationError> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(ValidationError::UnknownKey(key.to_string())),
        _ => Err(ValidationError::AmbiguousKey {
            key: key.to_string(),
            candidates: matches.into_iter().map(String::from).collect(),
        }),
    }
}

/// Builds a new task from command-line words. The title is checked later,
/// by the service, like any other draft.
pub fn parse_draft(args: &[String]) -> Result<TaskDraft, ValidationError> {
    let parsed = parse_args(args);
    let mut draft = TaskDraft::new(parsed.title);
    apply_metadata(&mut draft, parsed.metadata)?;
    Ok(draft)
}

/// Applies command-line edits on top of an existing draft. Free words, when
/// present, replace the title. `due:none`, `description:` and `tags:` clear.
pub fn apply_args(mut draft: TaskDraft, args: &[String]) -> Result<TaskDraft, ValidationError> {
    let parsed = parse_args(args);
    if !parsed.title.is_empty() {
        draft.title = parsed.title;
    }
    apply_metadata(&mut draft, parsed.metadata)?;
    Ok(draft)
}

fn apply_metadata(draft: &mut TaskDraft, metadata: HashMap<String, String>) -> Result<(), ValidationError> {
    for (key, value) in metadata {
        match expand_key(&key, &DRAFT_KEYS)?.as_str() {
            "status" => draft.status = value.parse()?,
            "priority" => draft.priority = value.parse()?,
            "due" => {
                draft.due_date = match value.trim() {
                    "" | "none" => None,
                    v => Some(parse_human_date(v)?),
                }
            }
            "description" => {
                draft.description = Some(value).filter(|d| !d.trim().is_empty());
            }
            "tags" => draft.tags = Tags::parse(&value),
            _ => {}
        }
    }
    Ok(())
}
