use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::controller::{Controller, Submission};
use crate::core::AppConfig;
use crate::gateway::{CompletionGateway, GatewayClient};
use crate::transcript::{Speaker, TranscriptStore, Turn};

fn print_turn(turn: &Turn) {
    match turn.sender {
        Speaker::User => println!("You: {}", turn.text),
        Speaker::Assistant => println!("AI: {}", turn.text),
    }
}

pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new().expect("Editor failed");

    let config = AppConfig::default();
    let gateway = GatewayClient::new(&config.relay_api_url);
    let mut controller = Controller::new(TranscriptStore::new(&config.transcript_path));

    // Replay the rehydrated transcript
    for turn in controller.transcript() {
        print_turn(turn);
    }
    println!("(/reset clears the conversation, Ctrl-D quits)");

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim() == "/reset" {
                    controller.reset()?;
                    for turn in controller.transcript() {
                        print_turn(turn);
                    }
                    continue;
                }

                match controller.submit(&line)? {
                    Submission::Accepted(token) => {
                        if let Some(placeholder) = controller.transcript().last() {
                            print_turn(placeholder);
                        }
                        let reply = gateway.complete(&controller.outbound()).await;
                        if controller.resolve(token, reply)? {
                            if let Some(turn) = controller.transcript().last() {
                                print_turn(turn);
                            }
                        }
                    }
                    Submission::EmptyInput => continue,
                    Submission::Busy => println!("Still waiting on the last reply..."),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
