//! Line-oriented log console on top of any `ufmt` writer (the UART on the board)

use ufmt::{uDebug, uDisplay, uWrite, uwrite};

use crate::dispatcher::ModuleChange;

pub struct Console<W> {
    writer: W,
}

impl<W: uWrite> Console<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    // Write errors are dropped: there is nowhere else to report them.

    pub fn write_line(&mut self, s: &str) {
        self.writer.write_str(s).ok();
        self.writer.write_str("\r\n").ok();
    }

    pub fn info(&mut self, msg: &str) {
        self.writer.write_str("[INF] ").ok();
        self.write_line(msg);
    }

    pub fn error<E: uDebug>(&mut self, msg: &str, err: &E) {
        uwrite!(self.writer, "[ERR] {}: {:?}\r\n", msg, err).ok();
    }

    pub fn debug<V: uDisplay>(&mut self, msg: &str, val: V) {
        uwrite!(self.writer, "[DBG] {}: {}\r\n", msg, val).ok();
    }

    pub fn module_change(&mut self, change: &ModuleChange) {
        uwrite!(
            self.writer,
            "[INF] module {}: {:?} x{} @ {}ms\r\n",
            change.index,
            change.kind,
            change.repetitions,
            change.frame_period_ms
        )
        .ok();
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn release(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ProgramError, ProgramKind};
    use core::convert::Infallible;

    #[derive(Default)]
    struct Buf(String);

    impl uWrite for Buf {
        type Error = Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn prefixes_levels() {
        let mut console = Console::new(Buf::default());
        console.info("ledterne ready");
        console.debug("remaining", 3u8);
        console.error("program", &ProgramError::InvalidStep);
        assert_eq!(
            console.release().0,
            "[INF] ledterne ready\r\n[DBG] remaining: 3\r\n[ERR] program: InvalidStep\r\n"
        );
    }

    #[test]
    fn formats_module_change() {
        let mut console = Console::new(Buf::default());
        console.module_change(&ModuleChange {
            index: 2,
            kind: ProgramKind::KnightRider,
            repetitions: 6,
            frame_period_ms: 40,
        });
        assert_eq!(console.writer().0, "[INF] module 2: KnightRider x6 @ 40ms\r\n");
    }
}
