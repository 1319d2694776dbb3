//! Simulation thread
//!
//! The engine lives on its own thread and ticks only when asked. The presentation
//! side enqueues inputs through an `InputSender`, sends `Advance` and then waits
//! for the result.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::error::{EngineError, RunnerError};
use crate::platform::queue::InputSender;
use crate::platform::time::Clock;
use crate::settings::Settings;
use crate::sim::{GameEngine, UpdateResult};

enum Command {
    Advance,
    Stop,
}

/// Handle to an engine running on a dedicated thread
pub struct GameRunner {
    inputs: InputSender,
    commands: mpsc::Sender<Command>,
    results: mpsc::Receiver<Result<UpdateResult, EngineError>>,
    handle: Option<JoinHandle<()>>,
}

impl GameRunner {
    /// Build the engine and move it onto a new simulation thread
    pub fn spawn(settings: Settings, clock: Box<dyn Clock>) -> Result<Self, RunnerError> {
        let engine = GameEngine::new(settings, clock)?;
        let inputs = engine.input_sender();
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || run(engine, command_rx, result_tx))
            .map_err(|e| {
                log::error!("Failed to spawn simulation thread: {e}");
                RunnerError::Disconnected
            })?;

        Ok(Self {
            inputs,
            commands: command_tx,
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Sender for queueing inputs from any thread
    pub fn inputs(&self) -> InputSender {
        self.inputs.clone()
    }

    /// Ask for one tick. The result arrives through `recv_update`.
    pub fn request_update(&self) -> Result<(), RunnerError> {
        self.commands
            .send(Command::Advance)
            .map_err(|_| RunnerError::Disconnected)
    }

    /// Block until the next requested tick completes
    pub fn recv_update(&self) -> Result<UpdateResult, RunnerError> {
        self.results
            .recv()
            .map_err(|_| RunnerError::Disconnected)?
            .map_err(RunnerError::from)
    }

    /// Stop the thread and wait for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // The thread may already be gone after a fatal error
        let _ = self.commands.send(Command::Stop);
        if handle.join().is_err() {
            log::error!("Simulation thread panicked");
        }
    }
}

impl Drop for GameRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    mut engine: GameEngine,
    commands: mpsc::Receiver<Command>,
    results: mpsc::Sender<Result<UpdateResult, EngineError>>,
) {
    log::debug!("Simulation thread started");
    while let Ok(Command::Advance) = commands.recv() {
        let result = engine.update();
        let fatal = result.is_err();
        if let Err(e) = &result {
            log::error!("Simulation aborted: {e}");
        }
        if results.send(result).is_err() || fatal {
            break;
        }
    }
    log::debug!("Simulation thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::{ExternalInput, SensorReading};
    use crate::platform::time::StepClock;
    use crate::sim::GameState;

    fn settings() -> Settings {
        Settings {
            screen_width_px: 1000,
            screen_height_px: 600,
            ..Default::default()
        }
    }

    fn runner() -> GameRunner {
        GameRunner::spawn(settings(), Box::new(StepClock::new(16.0))).unwrap()
    }

    #[test]
    fn test_ticks_on_request() {
        let runner = runner();
        runner.inputs().start_game();
        runner.request_update().unwrap();
        let first = runner.recv_update().unwrap();
        assert_eq!(first.game_state, GameState::Starting);
        assert_eq!(first.frame_count, 1);

        runner.request_update().unwrap();
        runner.request_update().unwrap();
        assert_eq!(runner.recv_update().unwrap().frame_count, 2);
        assert_eq!(runner.recv_update().unwrap().frame_count, 3);
        runner.shutdown();
    }

    #[test]
    fn test_inputs_from_another_thread() {
        let runner = runner();
        let inputs = runner.inputs();
        thread::spawn(move || inputs.send(ExternalInput::StartGame))
            .join()
            .unwrap();
        runner.request_update().unwrap();
        assert_eq!(runner.recv_update().unwrap().game_state, GameState::Starting);
    }

    #[test]
    fn test_fatal_error_ends_session() {
        let runner = runner();
        runner.inputs().sensor(SensorReading {
            x: f32::INFINITY,
            y: 0.0,
            z: 0.0,
        });
        runner.request_update().unwrap();
        assert!(matches!(
            runner.recv_update(),
            Err(RunnerError::Engine(EngineError::MalformedInput(_)))
        ));
        // Thread has exited; nothing more comes back
        let _ = runner.request_update();
        assert!(matches!(
            runner.recv_update(),
            Err(RunnerError::Disconnected)
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            starting_health: 0,
            ..settings()
        };
        assert!(matches!(
            GameRunner::spawn(settings, Box::new(StepClock::new(16.0))),
            Err(RunnerError::Config(_))
        ));
    }
}
