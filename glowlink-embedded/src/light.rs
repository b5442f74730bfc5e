use smart_leds::{RGB8, SmartLedsWrite, brightness, gamma};

use crate::Error;
use crate::state::DeviceState;

/// Runtime strip geometry, fixed per physical build.
#[derive(Debug, Clone)]
pub struct LightConfig {
    pub left_count: usize,
    pub right_count: usize,
}

/// Map a raw 12-bit photo sensor sample to an output brightness level.
/// Bright surroundings read low on the sensor, so the mapping is inverted.
pub fn ambient_level(raw: u16) -> u8 {
    let clamped = u32::from(raw.min(4095));
    (255 - (clamped * 255) / 4095) as u8
}

/// Renders the device record to a pair of LED strips. No state of its own
/// beyond the configured strip lengths.
pub struct LightPanel<L, R>
where
    L: SmartLedsWrite<Color = RGB8>,
    R: SmartLedsWrite<Color = RGB8>,
{
    left: L,
    right: R,
    config: LightConfig,
}

impl<L, R> LightPanel<L, R>
where
    L: SmartLedsWrite<Color = RGB8>,
    R: SmartLedsWrite<Color = RGB8>,
{
    pub fn new(left: L, right: R, config: LightConfig) -> Self {
        Self {
            left,
            right,
            config,
        }
    }

    /// Render the record to both strips. `ambient` is the mapped photo
    /// sensor level, used when auto brightness is enabled; without a sample
    /// the record's own brightness applies.
    pub fn render(&mut self, state: &DeviceState, ambient: Option<u8>) -> Result<(), Error> {
        let level = if state.auto_brightness {
            ambient.unwrap_or(state.brightness)
        } else {
            state.brightness
        };
        let color = if state.power {
            RGB8::new(state.color[0], state.color[1], state.color[2])
        } else {
            RGB8::default()
        };

        let pixels = core::iter::repeat(color).take(self.config.left_count);
        self.left
            .write(brightness(gamma(pixels), level))
            .map_err(|_| Error::Hardware)?;

        let pixels = core::iter::repeat(color).take(self.config.right_count);
        self.right
            .write(brightness(gamma(pixels), level))
            .map_err(|_| Error::Hardware)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    #[derive(Debug, Default)]
    struct MockStrip {
        frames: Rc<RefCell<Vec<Vec<RGB8>>>>,
    }

    impl MockStrip {
        fn last_frame(&self) -> Vec<RGB8> {
            self.frames.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl SmartLedsWrite for MockStrip {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), ()>
        where
            T: IntoIterator<Item = I>,
            I: Into<RGB8>,
        {
            self.frames
                .borrow_mut()
                .push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    fn panel() -> LightPanel<MockStrip, MockStrip> {
        LightPanel::new(
            MockStrip::default(),
            MockStrip::default(),
            LightConfig {
                left_count: 3,
                right_count: 2,
            },
        )
    }

    #[test]
    fn power_off_renders_dark() {
        let mut panel = panel();
        let mut state = DeviceState::new("dev");
        state.power = false;
        state.brightness = 255;
        state.color = [255, 255, 255];

        panel.render(&state, None).unwrap();

        assert_eq!(panel.left.last_frame(), alloc::vec![RGB8::default(); 3]);
        assert_eq!(panel.right.last_frame(), alloc::vec![RGB8::default(); 2]);
    }

    #[test]
    fn manual_brightness_uses_the_record() {
        let mut panel = panel();
        let mut state = DeviceState::new("dev");
        state.power = true;
        state.brightness = 255;
        state.color = [255, 0, 0];

        panel.render(&state, Some(0)).unwrap();

        assert_eq!(panel.left.last_frame(), alloc::vec![RGB8::new(255, 0, 0); 3]);
    }

    #[test]
    fn auto_brightness_follows_the_ambient_sample() {
        let mut panel = panel();
        let mut state = DeviceState::new("dev");
        state.power = true;
        state.auto_brightness = true;
        state.brightness = 255;
        state.color = [255, 255, 255];

        panel.render(&state, Some(0)).unwrap();
        assert_eq!(
            panel.left.last_frame(),
            alloc::vec![RGB8::default(); 3],
            "dark sample scales everything to zero"
        );

        panel.render(&state, None).unwrap();
        assert_eq!(
            panel.left.last_frame(),
            alloc::vec![RGB8::new(255, 255, 255); 3],
            "no sample falls back to the record brightness"
        );
    }

    #[test]
    fn ambient_mapping_is_inverted() {
        assert_eq!(ambient_level(0), 255);
        assert_eq!(ambient_level(4095), 0);
        assert_eq!(ambient_level(2047), 128);
        assert_eq!(ambient_level(u16::MAX), 0, "clamped to the 12-bit range");
    }
}
