//! Command — the typed interface for layout manager operations.
//!
//! Commands arrive either as tagged JSON from a host plugin bridge or as a
//! line typed into the application's scripting console (`switch Site Plan`).

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    // -----------------------------------------------------------------
    // Top-level commands
    // -----------------------------------------------------------------

    #[serde(rename = "status")]
    Status,

    #[serde(rename = "help")]
    Help {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },

    // -----------------------------------------------------------------
    // Layout commands
    // -----------------------------------------------------------------

    #[serde(rename = "layout.create")]
    LayoutCreate {
        name: String,
    },

    #[serde(rename = "layout.switch")]
    LayoutSwitch {
        name: String,
    },

    #[serde(rename = "layout.update")]
    LayoutUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    #[serde(rename = "layout.list")]
    LayoutList,

    #[serde(rename = "layout.save")]
    LayoutSave,
}


impl Command {
    pub fn from_json(text: &str) -> LayoutResult<Command> {
        serde_json::from_str(text)
            .map_err(|e| LayoutError::InvalidCommand(format!("failed to parse command JSON: {}", e)))
    }

    /// Parse a console line. Layout names run to the end of the line, so
    /// they may contain spaces.
    pub fn parse_line(line: &str) -> LayoutResult<Command> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let rest = (!rest.is_empty()).then(|| rest.to_string());

        match verb {
            "" => Err(LayoutError::InvalidCommand(
                "no command given; try 'help'".into(),
            )),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help { topic: rest }),
            "list" => Ok(Command::LayoutList),
            "save" => Ok(Command::LayoutSave),
            "update" => Ok(Command::LayoutUpdate { name: rest }),
            "create" => rest
                .map(|name| Command::LayoutCreate { name })
                .ok_or_else(|| LayoutError::InvalidCommand("usage: create <name>".into())),
            "switch" => rest
                .map(|name| Command::LayoutSwitch { name })
                .ok_or_else(|| LayoutError::InvalidCommand("usage: switch <name>".into())),
            other => Err(LayoutError::InvalidCommand(format!(
                "unknown command '{}'; try 'help'",
                other
            ))),
        }
    }
}
