pub mod swipe;

pub use swipe::{SwipeAnimation, SwipeAnimationKind, SwipeCallback, SwipeConfig, SwipeRecognizer};
