use parking_lot::Mutex;
use std::sync::Arc;

/// État partagé entre la boucle de simulation et l'interpréteur.
/// Un seul verrou : les ticks et les commandes sont sérialisés dessus.
pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_is_visible_across_clones() {
        let state = new_state(vec![1u32]);
        let other = state.clone();
        other.lock().push(2);
        assert_eq!(*state.lock(), vec![1, 2]);
    }
}
