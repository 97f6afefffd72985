use crate::app_state::State;
use crate::scene;
use crate::toolbar;

use winit::event::*;
use winit::keyboard::PhysicalKey;

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);

            self.scene
                .resize([new_size.width as f32, new_size.height as f32]);
            self.canvas.pending.set(Some(self.scene.viewport.transform()));
            self.sync_transform();
        }
    }

    /// Writes the last transform the viewport published, if any, to the uniform buffer.
    pub fn sync_transform(&mut self) {
        let Some(transform) = self.canvas.pending.take() else {
            return;
        };

        log::trace!("uploading {transform}");
        self.canvas.uniform.update_transform(
            &transform,
            (self.size.width as f32, self.size.height as f32),
        );
        self.gpu.queue.write_buffer(
            &self.canvas.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.canvas.uniform]),
        );
    }

    /// Returns `true` when the event was consumed by the canvas.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.modifiers = modifiers.state();
                false
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state != ElementState::Pressed {
                    return false;
                }
                let PhysicalKey::Code(code) = key_event.physical_key else {
                    return false;
                };

                match toolbar::action_for_key(code, self.input.modifiers) {
                    Some(action) => {
                        self.scene.apply(action);
                        self.sync_transform();
                        true
                    }
                    None => false,
                }
            }
            WindowEvent::DroppedFile(path) => {
                self.add_image_from(path);
                true
            }
            _ => {
                let Some(input_event) = self.input.winit.translate(event) else {
                    return false;
                };

                scene::route(&self.dispatcher, &mut self.scene, &input_event);
                self.sync_transform();
                true
            }
        }
    }
}
