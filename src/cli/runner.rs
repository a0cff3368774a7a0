use crate::{
    cli::{answers::collect_answers, AskArgs, Cli, Commands, WatchArgs},
    config::QuestionFile,
    constants::{exit_codes, SPINNER_FRAMES, SPINNER_INTERVAL_MS, STDIN_INDICATOR},
    error::{Error, Result},
    module::PromptModule,
    ui::{BarLog, BottomBar, Console, Output},
};
use crossterm::style::Stylize;
use serde_json::Value;
use std::{io, path::Path, process::Stdio, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    task::JoinHandle,
};

/// Dispatches a parsed command line against the process terminal and
/// returns the process exit code.
///
/// `ask` draws its prompts on stderr so the answers on stdout can be piped.
pub async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Ask(args) => {
            run_ask(args, &Console::terminal_on(Output::stderr())).await?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Watch(args) => {
            let code = run_watch(args, &Console::terminal()).await?;
            Ok(code.unwrap_or(exit_codes::FAILURE))
        }
    }
}

/// Asks the questions of `args.questions` and prints or saves the answers.
pub async fn run_ask(args: AskArgs, console: &Console) -> Result<()> {
    let answers = ask(&args, console).await?;
    let json = serde_json::to_string_pretty(&answers)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            log::info!("Answers written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Collects the answers for `args` as a JSON object.
pub async fn ask(args: &AskArgs, console: &Console) -> Result<Value> {
    let from_stdin = args.questions == Path::new(STDIN_INDICATOR);
    if from_stdin && args.answers.as_deref() == Some(STDIN_INDICATOR) {
        return Err(Error::IoError(io::Error::new(
            io::ErrorKind::InvalidInput,
            "questions and answers cannot both be read from stdin",
        )));
    }

    let file = if from_stdin {
        QuestionFile::from_yaml_str(&super::answers::read_from(io::stdin())?)?
    } else {
        QuestionFile::load(&args.questions)?
    };
    log::debug!("Loaded {} question(s)", file.len());

    let prefilled = collect_answers(args.answers.as_deref())?;
    let answers = PromptModule::new()
        .with_console(console.clone())
        .non_interactive(args.non_interactive)
        .prompt_with_answers(file.into_questions(), prefilled)
        .await?;
    Ok(answers.to_json())
}

fn spinner_line(frame: usize, status: &str) -> String {
    format!("{} {status}", SPINNER_FRAMES[frame % SPINNER_FRAMES.len()].cyan())
}

async fn forward_lines<R>(reader: R, bar_log: BarLog) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        bar_log.write_log(&line)?;
    }
    Ok(())
}

/// Runs `args.command`, streaming its stdout and stderr above a spinner bar.
///
/// Returns the command's exit code. Ctrl+C kills the command and returns
/// [`Error::Interrupted`].
pub async fn run_watch(args: WatchArgs, console: &Console) -> Result<Option<i32>> {
    let Some((program, rest)) = args.command.split_first() else {
        return Err(Error::IoError(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no command to watch",
        )));
    };

    log::debug!("Spawning {program} {rest:?}");
    let mut child = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut bar = BottomBar::new(console, spinner_line(0, &args.status))?;

    let mut forwarders: Vec<JoinHandle<Result<()>>> = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        forwarders.push(tokio::spawn(forward_lines(stdout, bar.log())));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(tokio::spawn(forward_lines(stderr, bar.log())));
    }

    let ticker = {
        let bar_log = bar.log();
        let status = args.status.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(SPINNER_INTERVAL_MS));
            let mut frame = 0;
            loop {
                interval.tick().await;
                frame += 1;
                if let Err(e) = bar_log.update_bottom_bar(spinner_line(frame, &status)) {
                    log::warn!("Failed to update status bar: {e}");
                    break;
                }
            }
        })
    };

    let waited = loop {
        tokio::select! {
            status = child.wait() => break status.map_err(Error::from),
            key = bar.next_keypress() => match key {
                Ok(key) => log::trace!("Ignoring {key:?} while watching"),
                // no keyboard left; the command still runs to completion
                Err(Error::InputClosed) => break child.wait().await.map_err(Error::from),
                Err(err) => {
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to stop {program}: {e}");
                    }
                    break Err(err);
                }
            }
        }
    };
    ticker.abort();

    for forwarder in forwarders {
        match forwarder.await {
            Ok(Err(e)) => log::warn!("Lost command output: {e}"),
            Err(e) => log::warn!("Output forwarder failed: {e}"),
            Ok(Ok(())) => {}
        }
    }

    let status = waited?;
    let summary = if status.success() {
        format!("{} {}", "✔".green(), args.status)
    } else {
        format!("{} {} ({status})", "✖".red(), args.status)
    };
    bar.update_bottom_bar(summary)?;
    bar.close();
    Ok(status.code())
}
