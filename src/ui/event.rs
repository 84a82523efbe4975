//! Event handling module for the application
//!
//! Terminal input is polled on a separate thread and forwarded to the main
//! loop through a channel, together with regular tick events.
//!
//! The `EventHandler` struct owns that thread and shuts it down on drop.
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use log::error;

/// Events that can be processed by the application
#[derive(Debug, Clone)]
pub enum Event
{
    /// Regular time tick for updating UI elements
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Text pasted into the terminal
    Paste(String),
    /// Terminal resize event with new dimensions
    Resize(u16, u16),
}

/// Handles terminal events
///
/// Manages event handling in a separate thread and provides
/// a way to receive events through a channel.
pub struct EventHandler
{
    /// Receiver side of the event channel to get events from the handler thread
    event_receiver: mpsc::Receiver<Event>,
    /// Sender for shutdown the thread for graceful shutdown
    // The receiver is moved to the thread
    shutdown_sender: mpsc::Sender<()>,
    /// Handle to keep the thread alive
    // Option is used to move the handle out in `drop`
    thread_handle: Option<JoinHandle<()>>,
}

impl EventHandler
{
    /// Creates a new event handler with the specified tick rate
    ///
    /// # Arguments
    ///
    /// * `tick_rate` - The duration between tick events
    ///
    /// # Returns
    ///
    /// A new `EventHandler` instance with a running background thread
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self
    {
        let (event_sender, event_receiver) = mpsc::channel();
        let (shutdown_sender, shutdown_receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop
            {
                if shutdown_receiver.try_recv().is_ok()
                {
                    break;
                }

                // If more time than tick_rate has passed, don't wait at all
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                let ready = match event::poll(timeout)
                {
                    Ok(ready) => ready,
                    Err(err) =>
                    {
                        error!("Error polling events: {err}");
                        break;
                    }
                };

                if ready
                {
                    let forwarded = match event::read()
                    {
                        // Release and repeat events show up on some platforms
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press =>
                        {
                            Some(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Paste(text)) => Some(Event::Paste(text)),
                        Ok(CrosstermEvent::Resize(width, height)) =>
                        {
                            Some(Event::Resize(width, height))
                        }
                        Ok(_) => None,
                        Err(err) =>
                        {
                            error!("Error reading event: {err}");
                            break;
                        }
                    };

                    // Break the loop if sending fails (receiver dropped)
                    if let Some(event) = forwarded
                    {
                        if event_sender.send(event).is_err()
                        {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate
                {
                    if event_sender.send(Event::Tick).is_err()
                    {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            event_receiver,
            shutdown_sender,
            thread_handle: Some(handle),
        }
    }

    /// Gets the next event from the event channel
    ///
    /// This method blocks until an event is available
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is disconnected.
    pub fn next(&self) -> Result<Event>
    {
        self.event_receiver
            .recv()
            .context("Event channel disconnected")
    }
}

impl Drop for EventHandler
{
    fn drop(&mut self)
    {
        // Signal shutdown, ignore if already closed
        let _ = self.shutdown_sender.send(());

        if let Some(handle) = self.thread_handle.take()
        {
            let _ = handle.join();
        }
    }
}
