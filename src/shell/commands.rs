//! Line-oriented command interface over an editor session. One command per
//! line; every mutation the editor supports is reachable from here, which
//! is what the integration tests drive.

use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use time::{macros::format_description, OffsetDateTime};

use crate::editor::mode::Mode;
use crate::editor::selection::Selection;
use crate::editor::session::{ClickEffect, EditorSession};
use crate::jobs::{JobBus, JobStatus};
use crate::persistence::persist;
use crate::render::Renderer;

#[derive(Debug, Default, Clone)]
pub struct CommandOutcome {
    pub rows: Vec<String>,
    pub mutated: bool,
}

impl CommandOutcome {
    fn row(text: impl Into<String>, mutated: bool) -> Self {
        CommandOutcome {
            rows: vec![text.into()],
            mutated,
        }
    }
}

pub const HELP: &str = "\
Commands:
  mode <view|add-node|add-edge|edit>   switch interaction mode
  click node <id>                      click a node
  click link <source> <target>         click a link
  click background                     click empty space
  set node-name <text> | set node-color <color>
  set edge-label <text> | set edge-color <color>
  apply                                apply the edit form to the selection
  cancel                               abort the pending edge
  delete                               delete the selection (cascades)
  generate <n>                         replace with a random graph
  name <text>                          rename the graph
  show                                 print the graph as a JSON document
  stats                                counts and interaction state
  export [path]                        write a JSON document
  export-csv [path]                    write nodes/links CSV files
  import <path>                        replace the graph from a JSON file
  job start <title> [-- <description>] queue a background job
  job status <id> <status> [progress]  update a job
  jobs                                 list jobs, newest first";

fn log_path_for_now() -> PathBuf {
    let base = persist::command_log_dir();
    let now = OffsetDateTime::now_utc();
    let fmt = format_description!("[year][month][day]");
    let date = now.format(&fmt).unwrap_or_else(|_| "unknown".into());
    base.join(format!("commands_{}.log", date))
}

fn log_command(input: &str, outcome: &Result<CommandOutcome>) {
    let path = log_path_for_now();
    if let Some(parent) = path.parent() {
        let _ = create_dir_all(parent);
    }
    let now = OffsetDateTime::now_utc();
    let ts_fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let ts = now.format(&ts_fmt).unwrap_or_else(|_| "".into());
    let status = match outcome {
        Ok(o) => format!("OK mutated={} rows={}", o.mutated, o.rows.len()),
        Err(e) => format!("ERR {}", e),
    };
    let line = format!("{} | {} | {}\n", ts, status, input.trim());
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = file.write_all(line.as_bytes());
    }
}

pub fn execute_and_log(
    session: &mut EditorSession,
    jobs: &mut JobBus,
    renderer: &mut dyn Renderer,
    input: &str,
) -> Result<CommandOutcome> {
    let res = execute_command(session, jobs, renderer, input);
    log_command(input, &res);
    res
}

pub fn execute_command(
    session: &mut EditorSession,
    jobs: &mut JobBus,
    renderer: &mut dyn Renderer,
    input: &str,
) -> Result<CommandOutcome> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("empty command");
    }
    let mut tokens = trimmed.split_whitespace();
    let head = tokens.next().unwrap_or_default().to_ascii_lowercase();

    match head.as_str() {
        "help" => Ok(CommandOutcome::row(HELP, false)),
        "mode" => {
            let arg = tokens.next().ok_or_else(|| anyhow!("mode requires an argument"))?;
            let mode = Mode::parse(arg).ok_or_else(|| anyhow!("unknown mode: {arg}"))?;
            session.set_mode(mode);
            Ok(CommandOutcome::row(format!("mode: {}", mode.label()), false))
        }
        "click" => exec_click(session, renderer, tokens),
        "set" => exec_set(session, tokens, trimmed),
        "apply" => exec_apply(session),
        "cancel" => {
            session.cancel_edge();
            Ok(CommandOutcome::row("edge cancelled", false))
        }
        "delete" => {
            session.delete_selected()?;
            Ok(CommandOutcome::row("deleted", true))
        }
        "generate" => {
            let arg = tokens
                .next()
                .ok_or_else(|| anyhow!("generate requires a node count"))?;
            let count: usize = arg.parse().map_err(|_| anyhow!("invalid node count: {arg}"))?;
            session.generate_new(count)?;
            Ok(CommandOutcome::row(
                format!(
                    "generated {} nodes, {} links",
                    session.store().node_count(),
                    session.store().link_count()
                ),
                true,
            ))
        }
        "name" => {
            let rest = rest_after(trimmed, "name");
            if rest.is_empty() {
                bail!("name requires text");
            }
            session.set_graph_name(rest);
            Ok(CommandOutcome::row(
                format!("graph name: {}", session.graph_name()),
                true,
            ))
        }
        "show" => {
            let json = session.to_document().to_json()?;
            Ok(CommandOutcome::row(json, false))
        }
        "stats" => Ok(CommandOutcome {
            rows: stats_rows(session),
            mutated: false,
        }),
        "export" => {
            let path = tokens.next().map(PathBuf::from);
            let written = persist::save_document(&session.to_document(), path.as_deref())?;
            Ok(CommandOutcome::row(
                format!("exported to {}", written.display()),
                false,
            ))
        }
        "export-csv" => {
            let base = tokens
                .next()
                .map(PathBuf::from)
                .unwrap_or_else(|| persist::timestamped_export_path(session.graph_name()));
            let (nodes_path, links_path) = persist::export_csv(&session.to_document(), &base)?;
            Ok(CommandOutcome {
                rows: vec![
                    format!("exported nodes to {}", nodes_path.display()),
                    format!("exported links to {}", links_path.display()),
                ],
                mutated: false,
            })
        }
        "import" => {
            let arg = tokens.next().ok_or_else(|| anyhow!("import requires a path"))?;
            let document = persist::load_document(Path::new(arg))?;
            session.apply_document(document);
            Ok(CommandOutcome::row(
                format!(
                    "imported {} nodes, {} links",
                    session.store().node_count(),
                    session.store().link_count()
                ),
                true,
            ))
        }
        "job" => exec_job(jobs, tokens, trimmed),
        "jobs" => {
            if jobs.is_empty() {
                return Ok(CommandOutcome::row("no jobs", false));
            }
            let rows = jobs
                .jobs()
                .map(|j| serde_json::to_string(j).unwrap_or_else(|_| j.id.clone()))
                .collect();
            Ok(CommandOutcome {
                rows,
                mutated: false,
            })
        }
        other => Err(anyhow!("unrecognized command: {other}")),
    }
}

// Text arguments keep their internal whitespace: everything after the fixed
// command words is the value.
fn rest_after<'a>(line: &'a str, prefix: &str) -> &'a str {
    line[prefix.len()..].trim()
}

fn exec_click<'a>(
    session: &mut EditorSession,
    renderer: &mut dyn Renderer,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<CommandOutcome> {
    let target = tokens
        .next()
        .ok_or_else(|| anyhow!("click requires a target: node, link, or background"))?;
    let effect = match target.to_ascii_lowercase().as_str() {
        "node" => {
            let id = tokens.next().ok_or_else(|| anyhow!("click node requires an id"))?;
            session.click_node(&id.into(), renderer)?
        }
        "link" => {
            let source = tokens
                .next()
                .ok_or_else(|| anyhow!("click link requires source and target ids"))?;
            let target = tokens
                .next()
                .ok_or_else(|| anyhow!("click link requires source and target ids"))?;
            session.click_link(&source.into(), &target.into())?
        }
        "background" | "bg" => session.click_background(renderer)?,
        other => bail!("unknown click target: {other}"),
    };
    let mutated = matches!(
        effect,
        ClickEffect::LinkCreated { .. } | ClickEffect::NodeAdded(_)
    );
    Ok(CommandOutcome::row(describe_effect(&effect), mutated))
}

fn describe_effect(effect: &ClickEffect) -> String {
    match effect {
        ClickEffect::Selected => "selected".to_string(),
        ClickEffect::Focused(id) => format!("focused: {id}"),
        ClickEffect::AnchorSet(id) => format!("edge source: {id} (click a second node)"),
        ClickEffect::AnchorKept => "already the edge source".to_string(),
        ClickEffect::LinkCreated { source, target } => {
            format!("link created: {source} -> {target}")
        }
        ClickEffect::EditTargetLoaded => "loaded into the edit form".to_string(),
        ClickEffect::NodeAdded(id) => format!("node added: {id}"),
        ClickEffect::SelectionCleared => "selection cleared".to_string(),
        ClickEffect::Ignored => "nothing happened".to_string(),
    }
}

fn exec_set<'a>(
    session: &mut EditorSession,
    mut tokens: impl Iterator<Item = &'a str>,
    line: &str,
) -> Result<CommandOutcome> {
    let field = tokens.next().ok_or_else(|| anyhow!("set requires a field"))?;
    let prefix_len = line.find(field).map(|i| i + field.len()).unwrap_or(line.len());
    let value = line[prefix_len..].trim().to_string();
    match field.to_ascii_lowercase().as_str() {
        "node-name" => session.node_form.name = value,
        "node-color" => {
            if value.is_empty() {
                bail!("set node-color requires a value");
            }
            session.node_form.color = value;
        }
        "edge-label" => session.edge_form.label = value,
        "edge-color" => {
            if value.is_empty() {
                bail!("set edge-color requires a value");
            }
            session.edge_form.color = value;
        }
        other => bail!("unknown field: {other}"),
    }
    Ok(CommandOutcome::row("ok", false))
}

fn exec_apply(session: &mut EditorSession) -> Result<CommandOutcome> {
    match session.selection() {
        Selection::Node(_) => {
            let id = session.apply_node_edit()?;
            Ok(CommandOutcome::row(format!("node updated: {id}"), true))
        }
        Selection::Link { .. } => {
            let (source, target) = session.apply_link_edit()?;
            Ok(CommandOutcome::row(
                format!("link updated: {source} -> {target}"),
                true,
            ))
        }
        Selection::None => bail!("nothing selected"),
    }
}

fn exec_job<'a>(
    jobs: &mut JobBus,
    mut tokens: impl Iterator<Item = &'a str>,
    line: &str,
) -> Result<CommandOutcome> {
    let verb = tokens
        .next()
        .ok_or_else(|| anyhow!("job requires a verb: start or status"))?;
    match verb.to_ascii_lowercase().as_str() {
        "start" => {
            let rest = line
                .find("start")
                .map(|i| line[i + "start".len()..].trim())
                .unwrap_or("");
            if rest.is_empty() {
                bail!("job start requires a title");
            }
            let (title, description) = match rest.split_once(" -- ") {
                Some((t, d)) => (t.trim(), d.trim()),
                None => (rest, ""),
            };
            let id = jobs.start_job(title, description);
            Ok(CommandOutcome::row(format!("job queued: {id}"), false))
        }
        "status" => {
            let id = tokens.next().ok_or_else(|| anyhow!("job status requires an id"))?;
            let status_arg = tokens
                .next()
                .ok_or_else(|| anyhow!("job status requires a status"))?;
            let status = JobStatus::parse(status_arg)
                .ok_or_else(|| anyhow!("unknown status: {status_arg}"))?;
            let progress = match tokens.next() {
                Some(p) => Some(p.parse::<u8>().map_err(|_| anyhow!("invalid progress: {p}"))?),
                None => None,
            };
            if !jobs.update_status(id, status, progress) {
                bail!("no such job: {id}");
            }
            Ok(CommandOutcome::row("job updated", false))
        }
        other => Err(anyhow!("unknown job verb: {other}")),
    }
}

fn stats_rows(session: &EditorSession) -> Vec<String> {
    let selection = match session.selection() {
        Selection::None => "none".to_string(),
        Selection::Node(id) => format!("node {id}"),
        Selection::Link { source, target } => format!("link {source} -> {target}"),
    };
    let anchor = session
        .edge_anchor()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    vec![
        format!("graph: {}", session.graph_name()),
        format!("mode: {}", session.mode().label()),
        format!("nodes: {}", session.store().node_count()),
        format!("links: {}", session.store().link_count()),
        format!("selection: {selection}"),
        format!("edge source: {anchor}"),
    ]
}
