/// Frame shown full-size, if any. Independent of the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preview {
    shown: Option<usize>,
}

impl Preview {
    pub fn show(&mut self, index: usize) {
        self.shown = Some(index);
    }

    pub fn dismiss(&mut self) {
        self.shown = None;
    }

    pub fn shown(&self) -> Option<usize> {
        self.shown
    }
}
