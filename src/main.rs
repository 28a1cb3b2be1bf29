#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("ledterne is ATmega8 firmware; build it for an AVR target or run `cargo test`.");
}

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::interrupt::{self, Mutex};
    use core::cell::RefCell;

    use ledterne::config::{NUM_PIXELS, PLAYLIST};
    use ledterne::hal::{board, write_ports, FrameBaseTimer, PwmStepTimer, Uart, NUM_PORTS};
    use ledterne::{
        Console, Dispatcher, DutyCycles, FrameDivider, FrameTimer, IntensitySink, PortStepper,
        ProgramError, Renderer, FRAME_READY,
    };

    type Stepper = PortStepper<NUM_PIXELS, NUM_PORTS>;

    // Read by the PWM interrupt, written by the foreground loop
    static DUTY: DutyCycles<NUM_PIXELS> = DutyCycles::new();

    static STEPPER: Mutex<RefCell<Option<Stepper>>> = Mutex::new(RefCell::new(None));

    static FRAME_DIVIDER: Mutex<RefCell<FrameDivider>> =
        Mutex::new(RefCell::new(FrameDivider::new(PLAYLIST[0].frame_period_ms)));

    /// Frame timer handle for the dispatcher
    struct SharedFrameTimer;

    impl FrameTimer for SharedFrameTimer {
        fn set_period(&mut self, period_ms: u16) {
            interrupt::free(|cs| FRAME_DIVIDER.borrow(cs).borrow_mut().set_period(period_ms));
        }
    }

    /// Writes each pixel with the PWM interrupt held off, so no step sees half a colour
    struct PixelWriter<'a> {
        renderer: Renderer<'a, NUM_PIXELS>,
    }

    impl IntensitySink for PixelWriter<'_> {
        fn set_intensity(&mut self, pixel: usize, r: u8, g: u8, b: u8) {
            interrupt::free(|_| self.renderer.set_intensity(pixel, r, g, b));
        }
    }

    fn fatal(console: &mut Console<Uart>, err: ProgramError) -> ! {
        console.error("no animation program", &err);
        panic!()
    }

    #[avr_device::entry]
    fn main() -> ! {
        let mut console = Console::new(Uart::new());
        console.write_line("ledterne v0.1.0");

        let mut renderer = Renderer::new(&DUTY);
        renderer.clear();
        let stepper = board::pixel_ports();
        interrupt::free(|cs| {
            STEPPER.borrow(cs).replace(Some(stepper));
        });

        let mut dispatcher = match Dispatcher::new(&PLAYLIST) {
            Ok(dispatcher) => dispatcher,
            Err(err) => fatal(&mut console, err),
        };
        let mut writer = PixelWriter { renderer };
        let mut frame_timer = SharedFrameTimer;

        let mut pwm_timer = PwmStepTimer::new();
        let mut frame_base = FrameBaseTimer::new();
        pwm_timer.start();
        frame_base.start();

        // Enable interrupts globally
        unsafe { interrupt::enable() };
        console.info("Ready...");

        loop {
            // busy-poll, never sleep
            let _ = nb::block!(FRAME_READY.poll());

            match dispatcher.tick(&mut writer, &mut frame_timer) {
                Ok(Some(change)) => console.module_change(&change),
                Ok(None) => {}
                Err(err) => fatal(&mut console, err),
            }

            #[cfg(feature = "debug")]
            console.debug("remaining", dispatcher.remaining());
        }
    }

    #[avr_device::interrupt(atmega8)]
    fn TIMER1_COMPA() {
        interrupt::free(|cs| {
            if let Some(stepper) = STEPPER.borrow(cs).borrow_mut().as_mut() {
                let on = stepper.step(&DUTY);
                write_ports(stepper.owned(), &on);
            }
        });
    }

    #[avr_device::interrupt(atmega8)]
    fn TIMER2_COMP() {
        interrupt::free(|cs| {
            if FRAME_DIVIDER.borrow(cs).borrow_mut().tick() {
                FRAME_READY.raise();
            }
        });
    }
}
