//! Messages exchanged with `worker` processes.
//!
//! The parent writes one length-delimited [`PartitionRequest`] to the worker's
//! stdin and reads one length-delimited [`TallyReply`] from its stdout.

use std::{collections::HashMap, fmt::Display};

use common::Tally;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartitionRequest {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(string, repeated, tag = "2")]
    pub lines: Vec<String>,
    /// Corpus line number of `lines[0]`, starting at 1.
    #[prost(uint64, tag = "3")]
    pub first_line: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TallyReply {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(map = "string, uint64", tag = "2")]
    pub counts: HashMap<String, u64>,
    /// Set when the worker could not count its partition.
    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,
}

impl TallyReply {
    pub fn counted(index: u64, tally: Tally) -> Self {
        Self {
            index,
            counts: tally.into_inner(),
            error: None,
        }
    }

    pub fn failed(index: u64, reason: impl ToString) -> Self {
        Self {
            index,
            counts: HashMap::new(),
            error: Some(reason.to_string()),
        }
    }

    pub fn into_result(self) -> Result<Tally, String> {
        match self.error {
            Some(reason) => Err(reason),
            None => Ok(Tally::from(self.counts)),
        }
    }
}

impl Display for TallyReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TallyReply:{{ index: {}, distinct: {}, error: {:?} }}",
            self.index,
            self.counts.len(),
            self.error
        )
    }
}
