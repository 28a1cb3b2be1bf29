use embedded_hal::digital::v2::OutputPin;
use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

use ledterne::config::{NUM_PIXELS, PLAYLIST, PWM_STEPS};
use ledterne::drivers::GAMMA;
use ledterne::{
    AnimationModule, Channel, Dispatcher, DutyCycles, FrameDivider, IntensitySink, PortBit,
    PortStepper, ProgramKind, PwmStepper, Renderer,
};

fn expect_period(duty: u8) -> Vec<PinTransaction> {
    (0..PWM_STEPS)
        .map(|step| {
            if step < duty {
                PinTransaction::set(PinState::High)
            } else {
                PinTransaction::set(PinState::Low)
            }
        })
        .collect()
}

#[test]
fn outputs_follow_duty_cycle_over_one_period() {
    let duty = DutyCycles::<1>::new();
    let mut renderer = Renderer::new(&duty);
    renderer.set_intensity_raw(0, 3, 0, 255);

    let red = PinMock::new(&expect_period(3));
    let green = PinMock::new(&expect_period(0));
    let blue = PinMock::new(&expect_period(255));

    let mut stepper = PwmStepper::new([[red, green, blue]]);
    for _ in 0..PWM_STEPS {
        stepper.step(&duty).unwrap();
    }
    assert_eq!(stepper.counter(), 0);

    for mut pin in stepper.release().into_iter().flatten() {
        pin.done();
    }
}

#[test]
fn duty_change_takes_effect_on_next_step() {
    let duty = DutyCycles::<1>::new();
    let mut renderer = Renderer::new(&duty);

    let red = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::High),
    ]);
    let off = vec![PinTransaction::set(PinState::Low); 3];
    let green = PinMock::new(&off);
    let blue = PinMock::new(&off);

    let mut stepper = PwmStepper::new([[red, green, blue]]);
    stepper.step(&duty).unwrap();
    renderer.set_intensity(0, 63, 0, 0);
    stepper.step(&duty).unwrap();
    stepper.step(&duty).unwrap();

    for mut pin in stepper.release().into_iter().flatten() {
        pin.done();
    }
}

/// Counts how many steps an output spent switched on
#[derive(Default)]
struct OnCounter {
    on: u32,
}

impl OutputPin for OnCounter {
    type Error = core::convert::Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on += 1;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[test]
fn blended_colour_reaches_outputs_through_gamma() {
    let playlist = [AnimationModule::new(ProgramKind::MixedColorBlending, 1, 65)];
    let mut dispatcher = Dispatcher::new(&playlist).unwrap();
    let duty = DutyCycles::<NUM_PIXELS>::new();
    let mut renderer = Renderer::new(&duty);
    let mut divider = FrameDivider::new(PLAYLIST[0].frame_period_ms);

    // second frame shows the colour after one blend step: 2, 11, 24
    dispatcher.tick(&mut renderer, &mut divider).unwrap();
    dispatcher.tick(&mut renderer, &mut divider).unwrap();
    assert_eq!(divider.period(), 65);

    let pins: [[OnCounter; 3]; NUM_PIXELS] = Default::default();
    let mut stepper = PwmStepper::new(pins);
    for _ in 0..PWM_STEPS {
        stepper.step(&duty).unwrap();
    }

    for rgb in stepper.release() {
        let on: Vec<u32> = rgb.iter().map(|p| p.on).collect();
        assert_eq!(on, [GAMMA[2] as u32, GAMMA[11] as u32, GAMMA[24] as u32]);
    }
    assert_eq!(duty.load(NUM_PIXELS - 1, Channel::Blue), GAMMA[24]);
}

/// Keeps the last intensities written to each pixel
#[derive(Default)]
struct Recorder {
    pixels: [[u8; 3]; NUM_PIXELS],
}

impl IntensitySink for Recorder {
    fn set_intensity(&mut self, pixel: usize, r: u8, g: u8, b: u8) {
        self.pixels[pixel] = [r, g, b];
    }
}

#[test]
fn renderer_stores_gamma_of_every_written_intensity() {
    let playlist = [
        AnimationModule::new(ProgramKind::ColoredConveyor, 1, 20),
        AnimationModule::new(ProgramKind::KnightRider, 1, 40),
    ];
    let mut recorded = Dispatcher::new(&playlist).unwrap();
    let mut rendered = Dispatcher::new(&playlist).unwrap();
    let duty = DutyCycles::<NUM_PIXELS>::new();
    let mut renderer = Renderer::new(&duty);
    let mut recorder = Recorder::default();
    let mut divider = FrameDivider::new(20);

    for frame in 0..200 {
        recorded.tick(&mut recorder, &mut divider).unwrap();
        rendered.tick(&mut renderer, &mut divider).unwrap();
        if frame % 7 != 0 {
            continue;
        }
        for (pixel, rgb) in recorder.pixels.iter().enumerate() {
            for (channel, &value) in Channel::ALL.into_iter().zip(rgb) {
                assert_eq!(duty.load(pixel, channel), GAMMA[value as usize]);
            }
        }
    }
    assert!(recorder.pixels.iter().flatten().any(|&v| v != 0));
}

#[test]
fn port_stepper_drives_the_same_outputs_as_pin_stepper() {
    let duty = DutyCycles::<NUM_PIXELS>::new();
    let mut renderer = Renderer::new(&duty);
    for pixel in 0..NUM_PIXELS {
        let level = (pixel * 13) as u8;
        renderer.set_intensity(pixel, level, 63 - level, level / 2);
    }

    // three ports, pixels packed in channel order
    let map: [[PortBit; 3]; NUM_PIXELS] = core::array::from_fn(|pixel| {
        core::array::from_fn(|ch| {
            let n = pixel * 3 + ch;
            PortBit::new((n / 8) as u8, (n % 8) as u8)
        })
    });
    let mut ports = PortStepper::<NUM_PIXELS, 3>::new(map);
    let pins: [[OnCounter; 3]; NUM_PIXELS] = Default::default();
    let mut stepper = PwmStepper::new(pins);

    let mut port_on = [[0u32; 3]; NUM_PIXELS];
    for _ in 0..PWM_STEPS {
        let on = ports.step(&duty);
        stepper.step(&duty).unwrap();
        for (pixel, outs) in map.iter().enumerate() {
            for (ch, out) in outs.iter().enumerate() {
                if on[out.port as usize] & out.mask != 0 {
                    port_on[pixel][ch] += 1;
                }
            }
        }
    }

    assert_eq!(ports.counter(), stepper.counter());
    for (pixel, rgb) in stepper.release().iter().enumerate() {
        let pin_on: Vec<u32> = rgb.iter().map(|p| p.on).collect();
        assert_eq!(pin_on, port_on[pixel]);
        for (channel, on) in Channel::ALL.into_iter().zip(pin_on) {
            assert_eq!(on, duty.load(pixel, channel) as u32);
        }
    }
}
