//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Driver`]: Platform-specific I/O

use crate::{App, AppAction, Driver};

/// Generic runtime that orchestrates App and Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and app.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the app asks to quit.
    ///
    /// Renders once, connects once (the startup toggle), then:
    /// 1. Polls the driver for the next event
    /// 2. Feeds it to the App
    /// 3. Executes the resulting actions through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.start();
        if !self.execute(actions).await? {
            loop {
                let Some(event) = self.driver.poll_event().await? else {
                    continue;
                };

                let actions = self.app.handle(event);
                if self.execute(actions).await? {
                    break;
                }
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Execute actions in order.
    ///
    /// Returns `true` if should quit.
    async fn execute(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::Open { generation, address } => {
                    tracing::debug!(%generation, %address, "opening transport");
                    self.driver.open(generation, &address).await?;
                },
                AppAction::Send { generation, text } => {
                    self.driver.send(generation, text).await?;
                },
                AppAction::Close { generation } => {
                    tracing::debug!(%generation, "closing transport");
                    self.driver.close(generation);
                },
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
