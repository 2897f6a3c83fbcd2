use matrix::Matrix;
use serde::{Deserialize, Serialize};

/// The application layer message for the entire system.
///
/// The `type` tag and the field names are the wire contract shared with
/// any peer implementation; they must not be renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Coordinator -> worker: one row block of A plus the whole of B.
    Task {
        block_index: usize,
        #[serde(rename = "A_block")]
        a_block: Matrix,
        #[serde(rename = "B")]
        b: Matrix,
    },
    /// Worker -> coordinator: the computed product block, same index.
    Result {
        block_index: usize,
        #[serde(rename = "C_block")]
        c_block: Matrix,
    },
    /// Coordinator -> worker: terminate cleanly.
    Exit,
    /// A frame whose `type` tag this build does not recognize. Decoding
    /// one is not a framing error; the caller decides how to react,
    /// normally by logging and skipping it.
    #[serde(other)]
    Unknown,
}
