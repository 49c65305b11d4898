use std::time::Duration;

use druid::widget::prelude::*;
use druid::{Code, ImageBuf, TimerToken, Widget};

use crate::coord::WindowSize;
use crate::painter::convert_image;
use crate::worker::RenderWorker;
use crate::{Mandelbrot, ViewAction};

const FRAME_POLL: Duration = Duration::from_millis(16);

pub struct MandelbrotWidget {
    view: Mandelbrot,
    worker: RenderWorker,
    image: Option<ImageBuf>,
    timer: TimerToken,
}

impl MandelbrotWidget {
    pub fn new(window: WindowSize, threads: usize) -> Self {
        Self {
            view: Mandelbrot::new(window),
            worker: RenderWorker::new(threads),
            image: None,
            timer: TimerToken::INVALID,
        }
    }

    fn act(&mut self, action: ViewAction) {
        if self.view.apply(action) {
            self.request_frame();
        }
    }

    fn request_frame(&mut self) {
        let (width, height) = self.view.pixels();
        if let Some(mapping) = self.view.mapping() {
            self.worker.request(mapping, width, height);
        }
    }
}

impl Widget<()> for MandelbrotWidget {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _data: &mut (), _env: &Env) {
        match event {
            Event::Timer(token) if *token == self.timer => {
                if let Some(rgb_image) = self.worker.next_image() {
                    self.image = Some(convert_image(rgb_image));
                    ctx.request_paint();
                }
                self.timer = ctx.request_timer(FRAME_POLL);
            }
            Event::KeyDown(key_event) => {
                if key_event.code == Code::KeyR {
                    self.act(ViewAction::Reset);
                }
            }
            Event::MouseMove(_) => {
                if !ctx.is_focused() {
                    ctx.request_focus();
                }
            }
            Event::MouseDown(_) => ctx.set_active(true),
            Event::MouseUp(mouse) => {
                ctx.set_active(false);
                let druid::Point { x, y } = mouse.pos;
                self.act(ViewAction::Release(x, y));
            }
            Event::Wheel(mouse) => {
                let delta_y = mouse.wheel_delta.y;
                // horizontal-only wheel motion
                if delta_y != 0.0 {
                    self.act(ViewAction::Scroll(delta_y));
                }
            }
            _ => (),
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, _data: &(), _env: &Env) {
        match event {
            LifeCycle::WidgetAdded => {
                ctx.register_for_focus();
                self.timer = ctx.request_timer(FRAME_POLL);
                let Size { width, height } = ctx.size();
                self.view.apply(ViewAction::Resize(width, height));
                self.request_frame();
            }
            LifeCycle::Size(size) => {
                self.act(ViewAction::Resize(size.width, size.height));
            }
            _ => (),
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old_data: &(), _new_data: &(), _env: &Env) {}

    fn layout(
        &mut self,
        _ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &(),
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _: &(), _env: &Env) {
        if let Some(image_buf) = &self.image {
            let ctx_image = image_buf.to_image(ctx.render_ctx);
            let rect = image_buf.size().to_rect();
            ctx.draw_image(
                &ctx_image,
                rect,
                druid::piet::InterpolationMode::NearestNeighbor,
            );
        }
    }
}
