//! Music element control
//!
//! The simulation never touches audio directly; the frame driver reacts to
//! `GameEvent`s by calling into a `MusicControl`. Every operation must
//! tolerate a source that is not ready yet - browsers block autoplay and
//! load the track lazily, so a play request on an unready element is a
//! silent no-op.

/// Host audio toggle consumed by the frame driver
pub trait MusicControl {
    fn play(&self);
    fn pause(&self);
    fn is_ready(&self) -> bool;
}

/// Stand-in when no audio element exists (native runs, tests)
#[derive(Debug, Default)]
pub struct NullMusic;

impl MusicControl for NullMusic {
    fn play(&self) {}
    fn pause(&self) {}
    fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::GameMusic;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::MusicControl;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlAudioElement;

    /// HAVE_FUTURE_DATA: enough buffered to start playing
    const READY_TO_PLAY: u16 = 3;

    /// Background music backed by an `<audio>` element on the host page
    pub struct GameMusic {
        element: HtmlAudioElement,
    }

    impl GameMusic {
        /// Look up the audio element by id; `None` when the page has no music
        pub fn from_document(id: &str) -> Option<Self> {
            let document = web_sys::window()?.document()?;
            let element: HtmlAudioElement = document.get_element_by_id(id)?.dyn_into().ok()?;
            element.set_volume(0.3);
            Some(Self { element })
        }

        /// Rewind to the start (on game over the track stops and resets)
        pub fn rewind(&self) {
            self.element.set_current_time(0.0);
        }
    }

    impl MusicControl for GameMusic {
        fn play(&self) {
            if !self.is_ready() {
                return;
            }
            // The returned promise rejects when autoplay is blocked; the
            // next user gesture will retry
            if let Err(err) = self.element.play() {
                log::debug!("music play blocked: {err:?}");
            }
        }

        fn pause(&self) {
            let _ = self.element.pause();
        }

        fn is_ready(&self) -> bool {
            self.element.ready_state() >= READY_TO_PLAY
        }
    }
}
