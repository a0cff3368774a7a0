//! Pre-filled answers from the command line.

use crate::{
    answers::Answers,
    constants::STDIN_INDICATOR,
    error::{Error, Result},
};
use serde_json::{Map, Value};
use std::io::Read;

/// Reads `--answers`: a JSON object, or `-` to read one from stdin.
pub fn collect_answers(answers_arg: Option<&str>) -> Result<Answers> {
    let Some(answers_arg) = answers_arg else {
        return Ok(Answers::new());
    };
    let buf = if answers_arg == STDIN_INDICATOR {
        read_from(std::io::stdin())?
    } else {
        answers_arg.to_string()
    };
    let map = parse_string_to_json(&buf)?;
    log::debug!("Pre-filled {} answer(s) from the command line", map.len());
    Ok(Answers::from_json(Value::Object(map)))
}

/// Read content from a reader into a string.
pub(crate) fn read_from(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Parse a string into a JSON object. Anything but an object yields no answers.
pub fn parse_string_to_json(buf: &str) -> Result<Map<String, Value>> {
    let as_object = |value: Value| match value {
        Value::Object(map) => map,
        other => {
            log::warn!("Ignoring answers that are not a JSON object: {other}");
            Map::new()
        }
    };

    match serde_json::from_str::<Value>(buf) {
        Ok(value) => Ok(as_object(value)),
        Err(initial_err) => {
            // shells sometimes hand over \" instead of "
            if buf.contains("\\\"") {
                let cleaned = buf.replace("\\\"", "\"");
                serde_json::from_str::<Value>(&cleaned)
                    .map(as_object)
                    .map_err(|_| Error::JSONParseError(initial_err))
            } else {
                Err(Error::JSONParseError(initial_err))
            }
        }
    }
}
