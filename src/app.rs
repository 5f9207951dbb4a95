use crate::config;
use crate::llm::{Answer, Answers, ScholarClient};
use crate::starfield::{Bounds, StarField};
use crate::types::*;
use std::cell::Cell;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub const EMPTY_QUESTION_TITLE: &str = "Empty Question";
pub const EMPTY_QUESTION_BODY: &str = "Oh no! \nLooks like you haven't asked a question yet. \nPlease type your question in the input box first.";

/// Roughly three seconds at the star tick rate.
const FLASH_TICKS: u64 = 40;
const PAGE_LINES: usize = 10;

/// Line counts from the last answers frame, used to clamp scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerView {
    pub total: usize,
    pub visible: usize,
}

impl AnswerView {
    pub fn max_scroll(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }
}

type AnswerResult = Result<Answers, String>;

/// Top-level application state.
pub struct App {
    pub config: Config,
    config_path: Option<PathBuf>,
    pub question: String,
    pub answers: Vec<Answer>,
    pub answer_scroll: usize,
    pub answer_view: Cell<AnswerView>,
    /// Set once the first question goes out; the layout moves to the top.
    pub has_asked: bool,
    pub search: SearchState,
    pub dialog: Option<DialogKind>,
    pub should_quit: bool,
    pub tick: u64,
    pub sky: StarField,
    client: Option<ScholarClient>,
    answer_rx: Option<mpsc::UnboundedReceiver<AnswerResult>>,
    dirty: bool,
    /// Brief status message shown in the footer (e.g. "Copied!"), auto-clears.
    pub flash_message: Option<String>,
    pub flash_until: u64,
}

impl App {
    pub fn new(cols: u16, rows: u16) -> Self {
        let path = config::config_path();
        let cfg = config::load_config_from(&path);
        Self::with_config(cfg, Some(path), StarField::with_entropy(Bounds::from_cells(cols, rows)))
    }

    /// `config_path: None` keeps the config in memory only.
    pub fn with_config(cfg: Config, config_path: Option<PathBuf>, sky: StarField) -> Self {
        let client = match ScholarClient::from_config(&cfg) {
            Ok(client) => {
                info!(model = client.model(), "scholar client ready");
                if !client.has_api_key() {
                    warn!("no API key configured; searches will fail until one is set");
                }
                Some(client)
            }
            Err(e) => {
                warn!(error = %e, "could not build the HTTP client");
                None
            }
        };
        let question = cfg.last_question.clone().unwrap_or_default();

        Self {
            config: cfg,
            config_path,
            question,
            answers: Vec::new(),
            answer_scroll: 0,
            answer_view: Cell::new(AnswerView::default()),
            has_asked: false,
            search: SearchState::Idle,
            dialog: None,
            should_quit: false,
            tick: 0,
            sky,
            client,
            answer_rx: None,
            dirty: true,
            flash_message: None,
            flash_until: 0,
        }
    }

    pub fn save_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = config::save_config_to(path, &self.config) {
            warn!(error = %e, "could not save config");
        }
    }

    /// Star timer: advance the sky and the UI animation counter.
    pub fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.sky.tick(now);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.sky.resize(Bounds::from_cells(cols, rows));
    }

    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    /// Whether anything asked for a frame since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.sky.take_redraw_request() | std::mem::take(&mut self.dirty)
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash_message = Some(message.into());
        self.flash_until = self.tick + FLASH_TICKS;
    }

    pub fn active_flash(&self) -> Option<&str> {
        self.flash_message
            .as_deref()
            .filter(|_| self.tick < self.flash_until)
    }

    // ── Question editing ────────────────────────────────────────

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() {
            self.question.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.question.pop();
    }

    pub fn clear_question(&mut self) {
        self.question.clear();
    }

    // ── Searching ───────────────────────────────────────────────

    /// Send the current question to the model in the background.
    pub fn submit_question(&mut self) {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            self.dialog = Some(DialogKind::Notice {
                title: EMPTY_QUESTION_TITLE.into(),
                body: EMPTY_QUESTION_BODY.into(),
            });
            return;
        }
        if self.search == SearchState::Searching {
            self.flash("Still searching the stars...");
            return;
        }

        let client = match &self.client {
            Some(client) => client.clone(),
            None => match ScholarClient::from_config(&self.config) {
                Ok(client) => {
                    self.client = Some(client.clone());
                    client
                }
                Err(e) => {
                    self.fail(e.to_string());
                    return;
                }
            },
        };

        self.has_asked = true;
        self.answers.clear();
        self.answer_scroll = 0;
        self.search = SearchState::Searching;
        self.config.last_question = Some(question.clone());
        self.save_config();

        info!(question = %question, "searching the stars");
        let (tx, rx) = mpsc::unbounded_channel();
        self.answer_rx = Some(rx);
        tokio::spawn(async move {
            let result = client.ask(&question).await.map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
    }

    /// Called every loop iteration to pick up a finished search.
    pub fn poll_answers(&mut self) {
        let Some(rx) = &mut self.answer_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::error::TryRecvError::Empty) => return,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err("The search ended without an answer.".to_string())
            }
        };
        self.answer_rx = None;
        self.dirty = true;

        match result {
            Ok(answers) => {
                info!(count = answers.responses.len(), "answers received");
                if answers.responses.is_empty() {
                    self.flash("The stars were silent: no sources found.");
                }
                self.answers = answers.responses;
                self.answer_scroll = 0;
                self.search = SearchState::Answered;
            }
            Err(message) => self.fail(message),
        }
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "search failed");
        self.search = SearchState::Failed;
        self.dialog = Some(DialogKind::Error { message });
    }

    // ── Answers ─────────────────────────────────────────────────

    pub fn scroll_answers_up(&mut self, lines: usize) {
        let max = self.answer_view.get().max_scroll();
        self.answer_scroll = self.answer_scroll.min(max).saturating_sub(lines);
    }

    pub fn scroll_answers_down(&mut self, lines: usize) {
        let max = self.answer_view.get().max_scroll();
        self.answer_scroll = self.answer_scroll.saturating_add(lines).min(max);
    }

    pub fn page_answers_up(&mut self) {
        self.scroll_answers_up(self.page_lines());
    }

    pub fn page_answers_down(&mut self) {
        self.scroll_answers_down(self.page_lines());
    }

    pub fn scroll_answers_home(&mut self) {
        self.answer_scroll = 0;
    }

    pub fn scroll_answers_end(&mut self) {
        self.answer_scroll = self.answer_view.get().max_scroll();
    }

    fn page_lines(&self) -> usize {
        self.answer_view.get().visible.saturating_sub(1).max(PAGE_LINES)
    }

    pub fn copy_answers(&mut self) {
        if self.answers.is_empty() {
            self.flash("No answers to copy.");
            return;
        }
        let text = answers_as_text(&self.answers);
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(_) => self.flash("Copied to clipboard!"),
            Err(e) => self.flash(format!("Copy failed: {}", e)),
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────

    pub fn open_help(&mut self) {
        self.dialog = Some(DialogKind::Help);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }
}

/// Plain-text rendering of the answers for the clipboard.
pub fn answers_as_text(answers: &[Answer]) -> String {
    answers
        .iter()
        .map(|a| format!("{}\n{}", a.source_label(), a.info.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
