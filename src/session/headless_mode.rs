//! Headless mode execution

use super::SessionData;
use crate::backend::error::BackendError;
use crate::chart::{ChartState, ChartTables};
use crate::consts::cli_consts::chart;
use crate::logging::init_headless_logger;
use crate::notices::Notice;
use crate::panel::PanelView;

/// What a headless run does before printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// Refresh the panel and draw the charts.
    Show,
    /// Post a comment, then refresh the panel.
    Post(String),
    /// Delete one comment and wait for the backend to answer.
    Delete(i64),
    /// Delete every comment, then refresh the panel.
    DeleteAll,
    /// Draw the charts only.
    Chart,
}

/// Runs one command without a terminal UI
///
/// Events are printed as they arrive; the resulting panel and charts are
/// printed once the command has finished.
///
/// # Returns
/// * `Ok(())` - The command went through (a `Show` always succeeds and prints fallbacks)
/// * `Err` - The backend refused or could not be reached
pub async fn run_headless_mode(
    session: SessionData,
    command: HeadlessCommand,
) -> Result<(), BackendError> {
    init_headless_logger();

    let SessionData {
        backend,
        comments,
        chart,
        mut event_receiver,
        max_comments,
    } = session;
    let base_url = backend.environment().base_url();
    Notice::SessionStarting {
        mode: "headless",
        base_url: base_url.clone(),
    }
    .print();

    let printer = tokio::spawn(async move {
        while let Some(event) = event_receiver.recv().await {
            if event.should_display() {
                println!("{}", event);
            }
        }
    });

    let mut view = PanelView::new(max_comments);
    let mut chart_state = ChartState::NotLoaded;
    let result = match command {
        HeadlessCommand::Show => {
            match comments.refresh(max_comments).await {
                Ok(refresh) => view.apply_refresh(refresh),
                Err(e) => view.set_fallback(format!("Comments unavailable: {}", e)),
            }
            chart_state = match chart.draw_chart().await {
                Ok(tables) => ChartState::Loaded(Box::new(tables)),
                Err(e) => ChartState::Failed(e.to_string()),
            };
            Ok(())
        }
        HeadlessCommand::Post(text) => match comments.post_comment(&text).await {
            Ok(()) => comments
                .refresh(max_comments)
                .await
                .map(|refresh| view.apply_refresh(refresh)),
            Err(e) => Err(e),
        },
        HeadlessCommand::Delete(id) => comments
            .delete_by_id(id)
            .await
            .map_err(BackendError::from)
            .and_then(|result| result),
        HeadlessCommand::DeleteAll => comments
            .delete_all(max_comments)
            .await
            .map(|refresh| view.apply_refresh(refresh)),
        HeadlessCommand::Chart => chart.draw_chart().await.map(|tables| {
            chart_state = ChartState::Loaded(Box::new(tables));
        }),
    };

    // Dropping the controllers closes the event channel and ends the printer.
    drop(comments);
    drop(chart);
    let _ = printer.await;

    if view.login_link.is_some() || view.fallback.is_some() {
        for line in format_panel(&view, &base_url) {
            println!("{}", line);
        }
    }
    if chart_state != ChartState::NotLoaded {
        for line in format_chart(&chart_state) {
            println!("{}", line);
        }
    }

    result?;
    Notice::SessionFinished.print();
    Ok(())
}

/// Plain-text rendition of the comments panel.
pub fn format_panel(view: &PanelView, base_url: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(link) = &view.login_link {
        lines.push(format!("{} ({}{})", link.text, base_url, link.target));
    }
    lines.extend(view.notices.iter().cloned());
    if let Some(fallback) = &view.fallback {
        lines.push(fallback.clone());
    }
    if !view.panel_visible {
        return lines;
    }

    lines.push(format!(
        "Comments (showing up to {}):",
        view.selector.value()
    ));
    if view.comments.is_empty() && view.fallback.is_none() {
        lines.push("  No comments yet.".to_string());
    }
    for item in &view.comments {
        let delete_marker = if item.deletable { "  [delete]" } else { "" };
        lines.push(format!("  #{} {}{}", item.id, item.header, delete_marker));
        lines.push(format!("      {}", item.content));
    }
    lines
}

/// Plain-text rendition of both chart tables.
pub fn format_chart(state: &ChartState) -> Vec<String> {
    match state {
        ChartState::NotLoaded => vec!["Charts not loaded.".to_string()],
        ChartState::Failed(reason) => vec![format!("Charts unavailable: {}", reason)],
        ChartState::Loaded(tables) => format_tables(tables),
    }
}

fn format_tables(tables: &ChartTables) -> Vec<String> {
    let mut lines = vec![
        chart::RESPONSE_TITLE.to_string(),
        format!(
            "{:>14} {:>14} {:>14}",
            chart::TIME_AXIS_TITLE,
            chart::EXPERIMENTAL_LABEL,
            chart::THEORETICAL_LABEL
        ),
    ];
    for row in &tables.response {
        lines.push(format!(
            "{:>14.6} {:>14.6} {:>14.6}",
            row.time, row.experimental, row.theoretical
        ));
    }

    lines.push(match tables.residual_rms() {
        Some(rms) => format!("{} (RMS {:.6})", chart::RESIDUAL_TITLE, rms),
        None => chart::RESIDUAL_TITLE.to_string(),
    });
    lines.push(format!(
        "{:>14} {:>14}",
        chart::TIME_AXIS_TITLE,
        chart::RESIDUAL_LABEL
    ));
    for row in &tables.residuals {
        lines.push(format!("{:>14.6} {:>14.6}", row.time, row.residual));
    }
    lines
}
