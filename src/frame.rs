use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A `requestAnimationFrame` loop that can be stopped.
///
/// The callback re-arms itself each frame. The loop owns the only strong
/// reference to its closure, so dropping the loop releases everything the
/// frame callback captured.
pub struct FrameLoop {
    _tick: Tick,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

fn request(tick: &Weak<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.upgrade()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

impl FrameLoop {
    pub fn start(mut frame: impl FnMut() + 'static) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));

        let tick_inner = Rc::downgrade(&tick);
        let pending_inner = pending.clone();
        let running_inner = running.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending_inner.set(None);
            if !running_inner.get() {
                return;
            }
            frame();
            // the frame callback may have stopped us
            if running_inner.get() {
                pending_inner.set(request(&tick_inner));
            }
        }) as Box<dyn FnMut()>));
        pending.set(request(&Rc::downgrade(&tick)));

        Self {
            _tick: tick,
            pending,
            running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
