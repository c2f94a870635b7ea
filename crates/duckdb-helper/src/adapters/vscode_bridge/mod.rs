mod handler;
mod io;

use std::io::{BufRead, Write};

use crate::{
    cli::Args,
    error::{AppError, AppResult},
    protocol::{HostMessage, ViewRequest},
};

pub use handler::SessionHost;
use io::NdjsonIo;

pub fn run(args: Args) -> AppResult<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    rt.block_on(async move {
        let mut io = NdjsonIo::stdio();
        let mut host = match SessionHost::open(&args.path, args.session_options()) {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(error=%e, path=%args.path.display(), "cannot open database");
                io.write_json_line(&HostMessage::ConnectionError { error: e.to_string() })?;
                return Err(e);
            }
        };
        serve(&mut io, &mut host).await
    })
}

/// Announces readiness, then answers requests one at a time until EOF.
async fn serve<R: BufRead, W: Write>(io: &mut NdjsonIo<R, W>, host: &mut SessionHost) -> AppResult<()> {
    io.write_json_line(&host.ready_message())?;

    loop {
        let Some(line) = io.read_line()? else { break };
        if line.is_empty() {
            continue;
        }

        let req: ViewRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error=%e, line=%line, "ignoring malformed message");
                continue;
            }
        };

        let resp = host.handle(req).await;
        io.write_json_line(&resp)?;
    }

    host.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SessionOptions;
    use serde_json::{json, Value};
    use std::io::Cursor;

    #[tokio::test]
    async fn serves_a_view_session_over_ndjson() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.duckdb");
        let conn = duckdb::Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE first (a INTEGER); CREATE TABLE second (b INTEGER);")
            .unwrap();
        drop(conn);

        let input = [
            r#"{"type":"listTables"}"#,
            "",
            "not json",
            r#"{"type":"query","sql":"SELECT 1 AS x"}"#,
            r#"{"type":"query","sql":"SELECT * FROM thrid"}"#,
        ]
        .join("\n");

        let mut host = SessionHost::open(&path, SessionOptions::default()).unwrap();
        let mut io = NdjsonIo::new(Cursor::new(input), Vec::new());
        serve(&mut io, &mut host).await.unwrap();

        let out = String::from_utf8(io.into_output()).unwrap();
        let msgs: Vec<Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0]["type"], "update");
        assert_eq!(msgs[1], json!({"type": "tablesResult", "tables": ["first", "second"]}));
        assert_eq!(msgs[2], json!({"type": "queryResult", "results": [{"x": 1}]}));
        assert_eq!(msgs[3]["type"], "queryError");
        assert!(msgs[3]["error"].as_str().unwrap().contains("thrid"));
    }
}
