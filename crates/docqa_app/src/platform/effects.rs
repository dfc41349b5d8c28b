use std::sync::{mpsc, Arc};

use docqa_core::{percent_from, Effect, Msg, QueryAnswer, RelevantSection};
use docqa_engine::{BackendSettings, EngineEvent, EngineHandle, ProgressSink, QueryResponse};
use docqa_logging::{docqa_debug, docqa_info};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: BackendSettings, tx: mpsc::Sender<AppEvent>) -> std::io::Result<Self> {
        let sink: Arc<dyn ProgressSink> = Arc::new(MsgSink { tx });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckStats => {
                    docqa_info!("CheckStats");
                    self.engine.check_stats();
                }
                Effect::ExtractText { file } => {
                    docqa_info!("ExtractText name={} path={:?}", file.name, file.path);
                    self.engine.extract(file.path);
                }
                Effect::ProcessText { text } => {
                    docqa_info!("ProcessText text_len={}", text.len());
                    self.engine.process(text);
                }
                Effect::SubmitQuery { query } => {
                    docqa_info!("SubmitQuery query_len={}", query.len());
                    self.engine.query(query);
                }
            }
        }
    }
}

/// Feeds engine events back into the UI loop as messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl ProgressSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        docqa_debug!("engine event {:?}", event);
        let _ = self.tx.send(AppEvent::Core(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatsChecked(Ok(stats)) => Msg::StatsLoaded {
            success: stats.success,
            total_chunks: stats.total_chunks,
        },
        EngineEvent::StatsChecked(Err(err)) => Msg::StatsFailed {
            reason: err.to_string(),
        },
        EngineEvent::ExtractionProgress { percent } => Msg::ExtractionProgress { percent },
        EngineEvent::TextExtracted(Ok(text)) => Msg::TextExtracted { text },
        EngineEvent::TextExtracted(Err(err)) => Msg::ExtractionFailed {
            reason: err.to_string(),
        },
        EngineEvent::ProcessingProgress { progress, stage } => Msg::ProcessingProgress {
            percent: percent_from(progress),
            stage,
        },
        EngineEvent::ProcessingFinished(Ok(_)) => Msg::ProcessingCompleted,
        EngineEvent::ProcessingFinished(Err(err)) => Msg::ProcessingFailed {
            message: err.to_string(),
        },
        EngineEvent::QueryFinished(Ok(answer)) => Msg::QueryAnswered(map_answer(answer)),
        EngineEvent::QueryFinished(Err(err)) => Msg::QueryFailed {
            reason: err.to_string(),
        },
    }
}

fn map_answer(answer: QueryResponse) -> QueryAnswer {
    QueryAnswer {
        success: answer.success,
        query: answer.query,
        response: answer.response,
        relevant_sections: answer
            .relevant_sections
            .into_iter()
            .map(|section| RelevantSection {
                text: section.text,
                similarity: section.similarity,
                article_section: section.article_section,
                chunk_type: section.chunk_type,
            })
            .collect(),
    }
}
