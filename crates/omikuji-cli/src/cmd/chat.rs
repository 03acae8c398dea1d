use crate::cmd::draw::render;
use crate::output::print_json;
use anyhow::Result;
use omikuji_core::config::Config;
use omikuji_core::{ChatTurn, FortuneContext};
use omikuji_server::service::{self, ChatRequest, ChatResponse, DrawRequest, DrawResponse};
use omikuji_server::AppState;
use std::io::{BufRead, Write};
use tokio::runtime::Runtime;

const HELP: &str = "/draw でおみくじを引く、/exit で終了";

pub fn run(config: Config, session: Option<String>, message: Option<String>, json: bool) -> Result<()> {
    let state = AppState::new(config)?;
    let rt = Runtime::new()?;
    let mut conversation = Conversation::new(session);

    match message {
        Some(message) => {
            let response = rt.block_on(conversation.send(&state, message))?;
            if json {
                print_json(&response)
            } else {
                println!("{}", response.message);
                Ok(())
            }
        }
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            repl(&rt, &state, &mut conversation, stdin.lock(), &mut stdout, !json)?;
            if json {
                print_json(&conversation.transcript)?;
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Client-side chat state: the session to continue, the latest fortune to
/// ground replies in, and the transcript so far.
struct Conversation {
    session: Option<String>,
    context: Option<FortuneContext>,
    transcript: Vec<ChatTurn>,
}

impl Conversation {
    fn new(session: Option<String>) -> Self {
        Self {
            session,
            context: None,
            transcript: Vec::new(),
        }
    }

    async fn send(&mut self, state: &AppState, message: String) -> Result<ChatResponse> {
        self.transcript.push(ChatTurn::user(&message));
        let response = service::chat(
            state,
            ChatRequest {
                message: Some(message),
                session_id: self.session.clone(),
                actor_id: None,
                fortune_context: self.context.clone(),
            },
        )
        .await
        .map_err(|e| e.0)?;
        self.session = Some(response.session_id.to_string());
        self.transcript.push(response.to_turn());
        Ok(response)
    }

    async fn draw(&mut self, state: &AppState) -> DrawResponse {
        let response = service::draw(
            state,
            DrawRequest {
                session_id: self.session.clone(),
                ..DrawRequest::default()
            },
        )
        .await;
        self.session = Some(response.session_id.to_string());
        self.context = Some(FortuneContext::from(&response.fortune_data));
        response
    }
}

// ---------------------------------------------------------------------------
// REPL
// ---------------------------------------------------------------------------

fn repl<R: BufRead, W: Write>(
    rt: &Runtime,
    state: &AppState,
    conversation: &mut Conversation,
    input: R,
    out: &mut W,
    interactive: bool,
) -> Result<()> {
    if interactive {
        writeln!(out, "{HELP}")?;
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "/exit" | "/quit" => break,
            "/draw" => {
                let response = rt.block_on(conversation.draw(state));
                if interactive {
                    write!(out, "{}", render(&response))?;
                }
            }
            message => {
                let response = rt.block_on(conversation.send(state, message.to_string()))?;
                if interactive {
                    writeln!(out, "{}", response.message)?;
                }
            }
        }
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}
