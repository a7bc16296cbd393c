use crate::usecase::event::AppEvent;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

fn app_event_to_json(ev: &AppEvent) -> serde_json::Value {
    match ev {
        AppEvent::PhaseStarted { name } => json!({"type":"phase_started","name":name}),
        AppEvent::PhaseFinished { name } => json!({"type":"phase_finished","name":name}),
        AppEvent::RecordsParsed { count } => json!({"type":"records_parsed","count":count}),
        AppEvent::LinkRejected {
            href,
            title,
            reason,
        } => json!({"type":"link_rejected","href":href,"title":title,"reason":reason}),
        AppEvent::MalformedUrl { source_index, url } => {
            json!({"type":"malformed_url","source_index":source_index,"url":url})
        }
        AppEvent::DuplicatesGrouped { strategy, groups } => {
            json!({"type":"duplicates_grouped","strategy":strategy,"groups":groups})
        }
        AppEvent::DuplicateRemoved {
            kept_url,
            removed_urls,
            score,
        } => {
            json!({"type":"duplicate_removed","kept_url":kept_url,"removed_urls":removed_urls,"score":score})
        }
        AppEvent::LabelsAssigned { count } => json!({"type":"labels_assigned","count":count}),
        AppEvent::Finished { stats } => json!({"type":"finished","stats":stats}),
    }
}

pub fn spawn_ndjson_printer(mut rx: mpsc::Receiver<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let line = app_event_to_json(&ev);

            // NDJSON to stdout.
            println!("{line}");
        }
    })
}
