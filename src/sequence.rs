use crate::error::{Error, Result};

/// Callback told about every year change
pub type YearObserver = Box<dyn FnMut(&str)>;

/// Cyclic selector over the ordered year labels of a dataset.
///
/// Starts at index 0. Every mutating call notifies the registered
/// observers with the newly selected label, so the renderer can restyle.
pub struct SequenceController {
    years: Vec<String>,
    index: usize,
    observers: Vec<YearObserver>,
}

impl SequenceController {
    /// Build a controller over a non-empty list of year labels
    pub fn new(years: Vec<String>) -> Result<Self> {
        if years.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(Self {
            years,
            index: 0,
            observers: Vec::new(),
        })
    }

    /// Register a callback invoked after each advance/retreat/seek
    pub fn subscribe(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Step forward, wrapping from the last year to the first
    pub fn advance(&mut self) -> usize {
        self.index = if self.index == self.years.len() - 1 {
            0
        } else {
            self.index + 1
        };
        self.notify();
        self.index
    }

    /// Step back, wrapping from the first year to the last
    pub fn retreat(&mut self) -> usize {
        self.index = if self.index == 0 {
            self.years.len() - 1
        } else {
            self.index - 1
        };
        self.notify();
        self.index
    }

    /// Jump to `index`; out-of-range input leaves the state untouched
    pub fn seek(&mut self, index: usize) -> Result<usize> {
        if index >= self.years.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.years.len(),
            });
        }
        self.index = index;
        self.notify();
        Ok(self.index)
    }

    pub fn current_attribute(&self) -> &str {
        &self.years[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    fn notify(&mut self) {
        let year = &self.years[self.index];
        for observer in &mut self.observers {
            observer(year);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn eight_years() -> SequenceController {
        SequenceController::new((2013..=2020).map(|y| y.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_starts_at_first_year() {
        let seq = eight_years();
        assert_eq!(seq.index(), 0);
        assert_eq!(seq.current_attribute(), "2013");
        assert_eq!(seq.len(), 8);
    }

    #[test]
    fn test_full_cycle_wraps_forward() {
        let mut seq = eight_years();
        for expected in 1..=7 {
            assert_eq!(seq.advance(), expected);
        }
        assert_eq!(seq.current_attribute(), "2020");
        assert_eq!(seq.advance(), 0);
        assert_eq!(seq.current_attribute(), "2013");
    }

    #[test]
    fn test_retreat_wraps_backward() {
        let mut seq = eight_years();
        assert_eq!(seq.retreat(), 7);
        assert_eq!(seq.current_attribute(), "2020");
        assert_eq!(seq.retreat(), 6);
    }

    #[test]
    fn test_seek() {
        let mut seq = eight_years();
        assert_eq!(seq.seek(3), Ok(3));
        assert_eq!(seq.current_attribute(), "2016");
    }

    #[test]
    fn test_seek_out_of_range_keeps_index() {
        let mut seq = eight_years();
        seq.seek(5).unwrap();
        assert_eq!(seq.seek(8), Err(Error::IndexOutOfRange { index: 8, len: 8 }));
        assert_eq!(seq.index(), 5);
    }

    #[test]
    fn test_single_year_cycles_in_place() {
        let mut seq = SequenceController::new(vec!["2013".into()]).unwrap();
        assert_eq!(seq.advance(), 0);
        assert_eq!(seq.retreat(), 0);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            SequenceController::new(Vec::new()),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn test_observers_see_each_change() {
        let mut seq = eight_years();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        seq.subscribe(move |year| sink.borrow_mut().push(year.to_string()));

        seq.advance();
        seq.retreat();
        seq.retreat();
        seq.seek(4).unwrap();
        let _ = seq.seek(99);

        assert_eq!(*seen.borrow(), vec!["2014", "2013", "2020", "2017"]);
    }
}
