//! Host for one or more scratch cards laid out side by side.
//!
//! The board plays the part of the page: it mounts cards, keeps a listener
//! table in the shape of DOM registrations (press/move on the card element,
//! release on the whole window), routes input through it, and starts the
//! confetti stream when a card marked `celebrate` reports completion.
//! Unmounted cards are not drawn and get no input. Unmounting a card removes
//! all of its listeners; dropping the board unmounts everything.
//!
//! Move routing: a mouse move reaches the card under the pointer; a touch
//! move reaches the card the touch went down on, wherever the finger is now.

use std::cell::RefCell;
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::card::{CardProps, ScratchCard};
use crate::config::ScratchConfig;
use crate::confetti::Confetti;
use crate::error::Result;
use crate::font;
use crate::pointer::{PointerEvent, ScreenBox};

pub const BACKGROUND: Rgba<u8> = Rgba([0x05, 0x05, 0x05, 0xFF]);
pub const TITLE_COLOR: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
pub const SUBTITLE_COLOR: Rgba<u8> = Rgba([0x71, 0x71, 0x7A, 0xFF]);
const TITLE_SCALE: i32 = 3;
const SUBTITLE_SCALE: i32 = 1;
const HEADER_HEIGHT: u32 = 48;
const CELEBRATION_SECS: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Down,
    Move,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerScope {
    /// Only fires for input over the card itself.
    Element,
    /// Fires wherever the input happens.
    Window,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Listener {
    card: CardId,
    scope: ListenerScope,
    kind: InputKind,
}

const CARD_LISTENERS: [(ListenerScope, InputKind); 3] = [
    (ListenerScope::Element, InputKind::Down),
    (ListenerScope::Element, InputKind::Move),
    (ListenerScope::Window, InputKind::Up),
];

#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub scale: f32, // display size / surface size
    pub margin: u32,
    pub gap: u32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self { scale: 1.0, margin: 32, gap: 48 }
    }
}

struct Slot {
    id: CardId,
    card: ScratchCard,
    rect: ScreenBox,
    celebrate: bool,
}

pub struct Board {
    layout: BoardLayout,
    slots: Vec<Slot>,
    listeners: Vec<Listener>,
    completed: Rc<RefCell<Vec<CardId>>>,
    /// Card the current touch went down on.
    touch_owner: Option<CardId>,
    confetti: Confetti,
    width: u32,
    height: u32,
}

impl Board {
    pub fn new(layout: BoardLayout) -> Self {
        let layout = BoardLayout { scale: layout.scale.max(0.1), ..layout };
        Self {
            layout,
            slots: Vec::new(),
            listeners: Vec::new(),
            completed: Rc::new(RefCell::new(Vec::new())),
            touch_owner: None,
            confetti: Confetti::new(1500, 0xC0FFEE),
            width: layout.margin * 2,
            height: layout.margin * 2 + HEADER_HEIGHT,
        }
    }

    /// Place a card to the right of the existing ones. It starts unmounted.
    #[tracing::instrument(skip_all, fields(title = %props.title))]
    pub fn add_card(&mut self, mut props: CardProps, config: ScratchConfig) -> Result<CardId> {
        let id = CardId(self.slots.len());
        let celebrate = props.celebrate;
        let completed = Rc::clone(&self.completed);
        let mut user_cb = props.on_complete.take();
        props.on_complete = Some(Box::new(move || {
            if let Some(cb) = user_cb.as_mut() {
                cb();
            }
            completed.borrow_mut().push(id);
        }));

        let disp_w = (config.width as f32 * self.layout.scale).round().max(1.0);
        let disp_h = (config.height as f32 * self.layout.scale).round().max(1.0);
        let card = ScratchCard::new(props, config)?;

        let left = if self.slots.is_empty() {
            self.layout.margin
        } else {
            self.width - self.layout.margin + self.layout.gap
        };
        let top = self.layout.margin + HEADER_HEIGHT;
        let rect = ScreenBox::new(left as f32, top as f32, disp_w, disp_h);

        self.width = left + disp_w as u32 + self.layout.margin;
        self.height = self.height.max(top + disp_h as u32 + self.layout.margin);
        self.slots.push(Slot { id, card, rect, celebrate });
        debug!(card = id.0, ?rect, "card placed");
        Ok(id)
    }

    /// Paint the card's overlay and register its listeners.
    pub fn mount(&mut self, id: CardId) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) else { return };
        self.listeners.retain(|l| l.card != id);
        slot.card.surface_mut().mount();
        for (scope, kind) in CARD_LISTENERS {
            self.listeners.push(Listener { card: id, scope, kind });
        }
        debug!(card = id.0, listeners = self.listeners.len(), "card mounted");
    }

    /// Remove every listener the card registered and drop its overlay.
    pub fn unmount(&mut self, id: CardId) {
        self.listeners.retain(|l| l.card != id);
        if self.touch_owner == Some(id) {
            self.touch_owner = None;
        }
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.card.surface_mut().unmount();
            debug!(card = id.0, "card unmounted");
        }
    }

    pub fn mount_all(&mut self) {
        let ids: Vec<CardId> = self.slots.iter().map(|s| s.id).collect();
        for id in ids {
            self.mount(id);
        }
    }

    pub fn unmount_all(&mut self) {
        let ids: Vec<CardId> = self.slots.iter().map(|s| s.id).collect();
        for id in ids {
            self.unmount(id);
        }
    }

    /// Route one input event through the listener table, in registration order.
    pub fn dispatch(&mut self, kind: InputKind, event: &PointerEvent) {
        let point = event.client_point();
        let touch = event.is_touch();
        if touch && kind == InputKind::Down {
            self.touch_owner = None;
        }

        for l in self.listeners.iter().filter(|l| l.kind == kind) {
            let Some(slot) = self.slots.iter_mut().find(|s| s.id == l.card) else { continue };
            let over = point.is_some_and(|p| slot.rect.contains(p));
            let targeted = if touch { self.touch_owner == Some(slot.id) } else { over };
            let surface = slot.card.surface_mut();
            match (l.scope, kind) {
                (ListenerScope::Element, InputKind::Down) if over => {
                    if touch {
                        self.touch_owner = Some(slot.id);
                    }
                    surface.pointer_down(event, slot.rect)
                }
                (ListenerScope::Element, InputKind::Move) if targeted => surface.pointer_move(event, slot.rect),
                (ListenerScope::Window, InputKind::Up) => surface.pointer_up(),
                _ => {}
            }
        }
        if kind == InputKind::Up {
            self.touch_owner = None;
        }

        let done: Vec<CardId> = self.completed.borrow_mut().drain(..).collect();
        for id in done {
            let celebrate = self.slots.iter().any(|s| s.id == id && s.celebrate);
            if celebrate {
                info!(card = id.0, "celebrating");
                self.confetti.celebrate(CELEBRATION_SECS);
            }
        }
    }

    /// Draw headers, cards and confetti into `frame`, resizing it to the board if needed.
    /// Visual: unmounted cards leave an empty spot under their header.
    pub fn render(&mut self, frame: &mut RgbaImage, dt: f32) {
        if frame.dimensions() != (self.width, self.height) {
            *frame = RgbaImage::new(self.width, self.height);
        }
        for px in frame.pixels_mut() {
            *px = BACKGROUND;
        }

        for slot in &self.slots {
            let r = slot.rect;
            let cx = (r.left + r.width / 2.0) as i32;
            let title_base = self.layout.margin as i32 + font::GLYPH_H * TITLE_SCALE;
            font::draw_text_centered(frame, cx, title_base, slot.card.title(), TITLE_SCALE, TITLE_COLOR);
            let subtitle = slot.card.subtitle().to_uppercase();
            font::draw_text_centered(frame, cx, title_base + 16, &subtitle, SUBTITLE_SCALE, SUBTITLE_COLOR);

            let Some(composed) = slot.card.compose() else { continue };
            let (w, h) = (r.width as u32, r.height as u32);
            if composed.dimensions() == (w, h) {
                imageops::replace(frame, &composed, r.left as i64, r.top as i64);
            } else {
                let scaled = imageops::resize(&composed, w, h, FilterType::Nearest);
                imageops::replace(frame, &scaled, r.left as i64, r.top as i64);
            }
        }

        self.confetti.update_and_render(frame, dt);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn card(&self, id: CardId) -> Option<&ScratchCard> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.card)
    }

    pub fn card_rect(&self, id: CardId) -> Option<ScreenBox> {
        self.slots.iter().find(|s| s.id == id).map(|s| s.rect)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_celebrating(&self) -> bool {
        self.confetti.is_active()
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        self.unmount_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Reveal;
    use std::cell::Cell;

    fn props(calls: &Rc<Cell<u32>>) -> CardProps {
        let c = Rc::clone(calls);
        CardProps {
            title: "Card".into(),
            subtitle: "Scratch".into(),
            reveal: Reveal::Message("YAY".into()),
            on_complete: Some(Box::new(move || c.set(c.get() + 1))),
            celebrate: true,
        }
    }

    fn two_card_board() -> (Board, CardId, CardId, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let (a_calls, b_calls) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let mut board = Board::new(BoardLayout::default());
        let a = board.add_card(props(&a_calls), ScratchConfig::default()).unwrap();
        let b = board.add_card(props(&b_calls), ScratchConfig::default()).unwrap();
        board.mount_all();
        (board, a, b, a_calls, b_calls)
    }

    fn center(r: ScreenBox) -> (f32, f32) {
        (r.left + r.width / 2.0, r.top + r.height / 2.0)
    }

    fn scratch_everywhere(board: &mut Board, r: ScreenBox) {
        board.dispatch(InputKind::Down, &PointerEvent::mouse(r.left, r.top));
        for y in (0..=r.height as i32).step_by(30) {
            for x in (0..=r.width as i32).step_by(30) {
                let ev = PointerEvent::mouse(r.left + x as f32, r.top + y as f32);
                board.dispatch(InputKind::Move, &ev);
            }
        }
        board.dispatch(InputKind::Up, &PointerEvent::mouse(0.0, 0.0));
    }

    #[test]
    fn cards_do_not_overlap() {
        let (board, a, b, _, _) = two_card_board();
        let (ra, rb) = (board.card_rect(a).unwrap(), board.card_rect(b).unwrap());
        assert!(ra.left + ra.width < rb.left);
        assert_eq!(board.size().0, (rb.left + rb.width) as u32 + 32);
        assert_eq!(board.listener_count(), 6);
    }

    #[test]
    fn press_only_reaches_the_card_under_the_pointer() {
        let (mut board, a, b, _, _) = two_card_board();
        let (x, y) = center(board.card_rect(a).unwrap());
        board.dispatch(InputKind::Down, &PointerEvent::mouse(x, y));
        assert!(board.card(a).unwrap().surface().cleared_pixels() > 0);
        assert_eq!(board.card(b).unwrap().surface().cleared_pixels(), 0);
        assert!(!board.card(b).unwrap().surface().is_engaged());
    }

    #[test]
    fn release_outside_any_card_disengages() {
        let (mut board, a, _, _, _) = two_card_board();
        let (x, y) = center(board.card_rect(a).unwrap());
        board.dispatch(InputKind::Down, &PointerEvent::mouse(x, y));
        board.dispatch(InputKind::Up, &PointerEvent::mouse(-50.0, -50.0));
        assert!(!board.card(a).unwrap().surface().is_engaged());
    }

    #[test]
    fn unmount_drops_every_listener_for_that_card() {
        let (mut board, a, b, _, _) = two_card_board();
        board.unmount(a);
        assert_eq!(board.listener_count(), 3);
        let (x, y) = center(board.card_rect(a).unwrap());
        board.dispatch(InputKind::Down, &PointerEvent::mouse(x, y));
        assert!(!board.card(a).unwrap().surface().is_mounted());
        assert_eq!(board.card(a).unwrap().surface().cleared_pixels(), 0);

        board.mount(a);
        board.mount(a);
        assert_eq!(board.listener_count(), 6);
        board.unmount(b);
        board.unmount_all();
        assert_eq!(board.listener_count(), 0);
    }

    #[test]
    fn completing_one_card_celebrates_once() {
        let (mut board, a, b, a_calls, b_calls) = two_card_board();
        let r = board.card_rect(a).unwrap();
        scratch_everywhere(&mut board, r);

        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 0);
        assert!(board.card(a).unwrap().surface().is_done());
        assert!(!board.card(b).unwrap().surface().is_done());
        assert!(board.is_celebrating());
    }

    #[test]
    fn plain_card_completes_without_confetti() {
        let calls = Rc::new(Cell::new(0));
        let mut board = Board::new(BoardLayout::default());
        let id = board
            .add_card(CardProps { celebrate: false, ..props(&calls) }, ScratchConfig::default())
            .unwrap();
        board.mount(id);
        let r = board.card_rect(id).unwrap();
        scratch_everywhere(&mut board, r);

        assert_eq!(calls.get(), 1);
        assert!(board.card(id).unwrap().surface().is_done());
        assert!(!board.is_celebrating());
    }

    #[test]
    fn mouse_move_goes_to_the_card_under_the_pointer() {
        let (mut board, a, b, _, _) = two_card_board();
        let ra = board.card_rect(a).unwrap();
        let (ax, ay) = center(ra);
        let (bx, by) = center(board.card_rect(b).unwrap());
        board.dispatch(InputKind::Down, &PointerEvent::mouse(ax, ay));
        let pressed = board.card(a).unwrap().surface().cleared_pixels();

        // Off A's right edge the mouse no longer reaches A; B was never pressed.
        board.dispatch(InputKind::Move, &PointerEvent::mouse(ra.left + ra.width + 10.0, ay));
        board.dispatch(InputKind::Move, &PointerEvent::mouse(bx, by));
        assert_eq!(board.card(a).unwrap().surface().cleared_pixels(), pressed);
        assert_eq!(board.card(b).unwrap().surface().cleared_pixels(), 0);
    }

    #[test]
    fn touch_keeps_scratching_the_card_it_started_on() {
        let (mut board, a, b, _, _) = two_card_board();
        let ra = board.card_rect(a).unwrap();
        let (x, y) = center(ra);
        board.dispatch(InputKind::Down, &PointerEvent::touch(x, y));
        let pressed = board.card(a).unwrap().surface().cleared_pixels();

        // Just past A's right edge: maps to local x = 410, so the disc clips into the raster.
        board.dispatch(InputKind::Move, &PointerEvent::touch(ra.left + ra.width + 10.0, y));
        let surface = board.card(a).unwrap().surface();
        assert!(surface.cleared_pixels() > pressed);
        assert_eq!(surface.surface().unwrap().get_pixel(399, 125).0[3], 0);

        // Over B the touch still belongs to A.
        let (bx, by) = center(board.card_rect(b).unwrap());
        board.dispatch(InputKind::Move, &PointerEvent::touch(bx, by));
        assert_eq!(board.card(b).unwrap().surface().cleared_pixels(), 0);
        assert!(!board.card(b).unwrap().surface().is_engaged());

        board.dispatch(InputKind::Up, &PointerEvent::touch(bx, by));
        assert!(!board.card(a).unwrap().surface().is_engaged());
    }

    #[test]
    fn unmounted_card_is_not_drawn() {
        let red = Rgba([255, 0, 0, 255]);
        let calls = Rc::new(Cell::new(0));
        let mut board = Board::new(BoardLayout::default());
        let reveal = Reveal::Image(RgbaImage::from_pixel(400, 250, red));
        let id = board
            .add_card(CardProps { reveal, ..props(&calls) }, ScratchConfig::default())
            .unwrap();
        let (x, y) = center(board.card_rect(id).unwrap());
        let mut frame = RgbaImage::new(1, 1);

        board.mount(id);
        board.render(&mut frame, 1.0 / 60.0);
        assert_ne!(*frame.get_pixel(x as u32, y as u32), BACKGROUND);

        board.unmount(id);
        board.render(&mut frame, 1.0 / 60.0);
        assert_eq!(*frame.get_pixel(x as u32, y as u32), BACKGROUND);
        assert_ne!(*frame.get_pixel(x as u32, y as u32), red);
    }

    #[test]
    fn scaled_layout_maps_back_to_surface_pixels() {
        let calls = Rc::new(Cell::new(0));
        let mut board = Board::new(BoardLayout { scale: 0.5, ..BoardLayout::default() });
        let id = board.add_card(props(&calls), ScratchConfig::default()).unwrap();
        board.mount(id);
        let r = board.card_rect(id).unwrap();
        assert_eq!((r.width, r.height), (200.0, 125.0));

        // Center of the displayed box is the center of the 400x250 raster.
        let (x, y) = center(r);
        board.dispatch(InputKind::Down, &PointerEvent::mouse(x, y));
        let surface = board.card(id).unwrap().surface().surface().unwrap();
        assert_eq!(surface.get_pixel(200, 125).0[3], 0);
        assert_eq!(surface.get_pixel(200, 10).0[3], 0xFF);
    }

    #[test]
    fn render_fills_the_board() {
        let (mut board, _, _, _, _) = two_card_board();
        let mut frame = RgbaImage::new(1, 1);
        board.render(&mut frame, 1.0 / 60.0);
        assert_eq!(frame.dimensions(), board.size());
        assert_eq!(*frame.get_pixel(0, 0), BACKGROUND);
    }
}
