//! Interactive terminal browser: the same view state machine the editor panel
//! uses, wired in-process to a [`SessionHost`].

mod render;

use std::io::Write;

use tokio::io::{self, AsyncBufReadExt};

use crate::{
    adapters::vscode_bridge::SessionHost,
    cli::Args,
    error::{AppError, AppResult},
    protocol::{HostMessage, ViewRequest},
    view::{PageSize, ResultView},
};

const HELP: &str = "\
commands:
  <sql>                 run a query
  .tables               refresh the table list
  .select <table>       put SELECT * FROM <table> in the input
  .run                  run the query input
  .next / .prev         change page
  .size <10|25|50|100>  rows per page
  .width <column> <dx>  widen (or narrow with negative dx) a column, in px
  .clear                clear input and results
  .quit                 exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Sql(String),
    Tables,
    Select(String),
    Run,
    Next,
    Prev,
    Size(PageSize),
    Width { column: String, delta: i32 },
    Clear,
    Help,
    Quit,
}

fn parse_command(line: &str) -> AppResult<Command> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('.') else {
        return Ok(Command::Sql(line.to_string()));
    };
    let mut parts = rest.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();
    let invalid = |msg: &str| AppError::Validation(msg.to_string());

    match (cmd, args.as_slice()) {
        ("tables", []) => Ok(Command::Tables),
        ("select", [name]) => Ok(Command::Select((*name).to_string())),
        ("run", []) => Ok(Command::Run),
        ("next", []) => Ok(Command::Next),
        ("prev", []) => Ok(Command::Prev),
        ("size", [n]) => {
            let n: usize = n.parse().map_err(|_| invalid("usage: .size <10|25|50|100>"))?;
            Ok(Command::Size(PageSize::try_from(n)?))
        }
        ("width", [column, dx]) => {
            let delta: i32 = dx.parse().map_err(|_| invalid("usage: .width <column> <dx>"))?;
            Ok(Command::Width {
                column: (*column).to_string(),
                delta,
            })
        }
        ("clear", []) => Ok(Command::Clear),
        ("help", []) => Ok(Command::Help),
        ("quit", []) | ("exit", []) => Ok(Command::Quit),
        _ => Err(invalid(&format!("unknown command: {line} (try .help)"))),
    }
}

pub fn run(args: Args) -> AppResult<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    rt.block_on(async move {
        let mut host = SessionHost::open(&args.path, args.session_options())?;
        let mut view = ResultView::new(args.page_size);
        let mut stdout = std::io::stdout();

        let ready = host.ready_message();
        deliver(&mut host, &mut view, ready).await;
        write!(stdout, "{}", render::render_tables(view.tables()))?;
        writeln!(stdout, "type .help for commands")?;
        stdout.flush()?;

        let mut lines = io::BufReader::new(io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let cmd = match parse_command(&line) {
                Ok(c) => c,
                Err(e) => {
                    writeln!(stdout, "{e}")?;
                    continue;
                }
            };
            if cmd == Command::Quit {
                break;
            }

            let screen = step(&mut host, &mut view, cmd).await;
            write!(stdout, "{screen}")?;
            stdout.flush()?;
        }

        host.close();
        Ok(())
    })
}

/// Applies one command and returns what to print.
async fn step(host: &mut SessionHost, view: &mut ResultView, cmd: Command) -> String {
    let request = match cmd {
        Command::Sql(sql) => view.submit_query(sql),
        Command::Run => view.submit(),
        Command::Tables => view.refresh_tables(),
        Command::Select(name) => {
            view.select_table(&name);
            return format!("query: {}\n", view.query_input());
        }
        Command::Next => {
            view.next_page();
            return render::render(view);
        }
        Command::Prev => {
            view.previous_page();
            return render::render(view);
        }
        Command::Size(size) => {
            view.set_page_size(size);
            return render::render(view);
        }
        Command::Width { column, delta } => {
            view.begin_resize(&column, 0);
            let resized = view.resize_to(delta);
            view.end_resize();
            return match resized {
                Some(_) => render::render(view),
                None => format!("no column named {column}\n"),
            };
        }
        Command::Clear => {
            view.clear();
            return String::new();
        }
        Command::Help => return HELP.to_string(),
        Command::Quit => return String::new(),
    };

    match request {
        Ok(req) => {
            let is_tables = req == ViewRequest::ListTables;
            let msg = host.handle(req).await;
            deliver(host, view, msg).await;
            if is_tables {
                render::render_tables(view.tables())
            } else {
                render::render(view)
            }
        }
        Err(AppError::Validation(_)) => render::render(view),
        Err(e) => format!("{e}\n"),
    }
}

/// Feeds a host message to the view, answering any follow-up request it makes.
async fn deliver(host: &mut SessionHost, view: &mut ResultView, msg: HostMessage) {
    let mut next = Some(msg);
    while let Some(msg) = next.take() {
        if let Some(req) = view.handle_message(msg) {
            next = Some(host.handle(req).await);
        }
    }
}
