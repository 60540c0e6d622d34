//! Response returned for every executed `Command`.

use serde::{Deserialize, Serialize};

use crate::error::LayoutResult;


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok { output: String },
    Error { message: String },
}


impl From<LayoutResult<String>> for Response {
    fn from(result: LayoutResult<String>) -> Self {
        match result {
            Ok(output) => Response::Ok { output },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }
}
