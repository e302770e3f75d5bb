//! DOM Events
//!
//! Native event objects and listener callbacks.

use std::fmt;
use std::rc::Rc;

use crate::Element;

/// Well-known event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseOver,
    MouseOut,
    KeyDown,
    KeyUp,
    KeyPress,
    Input,
    Change,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Submit,
    Reset,
    Scroll,
    Wheel,
    TouchStart,
    TouchEnd,
    TouchMove,
    TouchCancel,
    Load,
    Unload,
    Resize,
}

impl EventType {
    /// Parse a DOM event name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "keypress" => Self::KeyPress,
            "input" => Self::Input,
            "change" => Self::Change,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "scroll" => Self::Scroll,
            "wheel" => Self::Wheel,
            "touchstart" => Self::TouchStart,
            "touchend" => Self::TouchEnd,
            "touchmove" => Self::TouchMove,
            "touchcancel" => Self::TouchCancel,
            "load" => Self::Load,
            "unload" => Self::Unload,
            "resize" => Self::Resize,
            _ => return None,
        })
    }

    /// Check if this event type can bubble
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            EventType::Focus
                | EventType::Blur
                | EventType::Load
                | EventType::Unload
                | EventType::MouseEnter
                | EventType::MouseLeave
                | EventType::Scroll
        )
    }
}

/// Whether events with this name bubble. Unknown (custom) names do.
pub fn event_bubbles(name: &str) -> bool {
    EventType::from_name(name).is_none_or(|t| t.bubbles())
}

/// Current dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Options for constructing an event
#[derive(Debug, Clone, Copy)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

/// A native event travelling through the tree
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Option<Element>,
    current_target: Option<Element>,
    delegate_target: Option<Element>,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event whose bubbling follows the event type table
    pub fn new(event_type: &str) -> Self {
        Self::with_init(
            event_type,
            EventInit {
                bubbles: event_bubbles(event_type),
                cancelable: true,
            },
        )
    }

    /// Create an event with explicit options
    pub fn with_init(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            target: None,
            current_target: None,
            delegate_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Element the event was dispatched to
    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    /// Element whose listeners are currently running
    pub fn current_target(&self) -> Option<&Element> {
        self.current_target.as_ref()
    }

    /// Element matched by a delegation selector
    pub fn delegate_target(&self) -> Option<&Element> {
        self.delegate_target.as_ref()
    }

    /// Written by delegating listeners
    pub fn set_delegate_target(&mut self, element: Option<Element>) {
        self.delegate_target = element;
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation after the current node's listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners of the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub(crate) fn begin_dispatch(&mut self, target: Element) {
        self.target = Some(target);
        self.delegate_target = None;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
    }

    pub(crate) fn enter(&mut self, current: Element, phase: EventPhase) {
        self.current_target = Some(current);
        self.phase = phase;
    }

    pub(crate) fn finish_dispatch(&mut self) {
        self.current_target = None;
        self.phase = EventPhase::None;
    }
}

/// Event listener callback.
///
/// Invoked with the context element (`this`) and the event. Identity is the
/// allocation: clones compare equal, two handlers built from identical
/// closures do not.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Element, &mut Event)>);

impl Handler {
    pub fn new(f: impl Fn(&Element, &mut Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback
    pub fn call(&self, this: &Element, event: &mut Event) {
        (self.0)(this, event)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
