use tokio::sync::watch;

/// Per-domain revision counters backing the reactive read surface.
///
/// Every mutation bumps its domain's counter; the SSE streams wake on the
/// bump and re-emit a fresh snapshot. Counters are monotonically increasing
/// so a slow subscriber coalesces missed revisions into one emission.
#[derive(Debug)]
pub struct ChangeFeed {
    cart: watch::Sender<u64>,
    orders: watch::Sender<u64>,
    cards: watch::Sender<u64>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (cart, _) = watch::channel(0);
        let (orders, _) = watch::channel(0);
        let (cards, _) = watch::channel(0);
        Self {
            cart,
            orders,
            cards,
        }
    }

    pub fn cart_changed(&self) {
        self.cart.send_modify(|rev| *rev += 1);
    }

    pub fn orders_changed(&self) {
        self.orders.send_modify(|rev| *rev += 1);
    }

    pub fn cards_changed(&self) {
        self.cards.send_modify(|rev| *rev += 1);
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<u64> {
        self.cart.subscribe()
    }

    pub fn subscribe_orders(&self) -> watch::Receiver<u64> {
        self.orders.subscribe()
    }

    pub fn subscribe_cards(&self) -> watch::Receiver<u64> {
        self.cards.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
