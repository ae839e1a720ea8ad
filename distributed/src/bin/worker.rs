use anyhow::{Context, Result};
use common::count_tokens_from;
use distributed::{
    init_logger,
    service::{PartitionRequest, TallyReply},
};
use prost::Message;
use std::{
    io::{self, Read, Write},
    process,
};
use tracing::{debug, error};

fn main() -> Result<()> {
    let _guard = init_logger(None);

    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    let request = PartitionRequest::decode_length_delimited(buf.as_slice())
        .context("decode partition request")?;
    let index = request.index;
    debug!(index, lines = request.lines.len(), "counting");

    let first_line = request.first_line.max(1) as usize;
    let reply = match count_tokens_from(&request.lines, first_line) {
        Ok(tally) => TallyReply::counted(index, tally),
        Err(e) => {
            error!(index, "{e}");
            TallyReply::failed(index, e)
        }
    };
    let failed = reply.error.is_some();

    let mut stdout = io::stdout().lock();
    stdout.write_all(&reply.encode_length_delimited_to_vec())?;
    stdout.flush()?;

    if failed {
        process::exit(2);
    }
    Ok(())
}
