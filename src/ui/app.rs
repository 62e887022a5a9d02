use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::api::{CatalogClient, CatalogError};
use crate::config::Config;
use crate::product::Product;
use crate::search::{ProductIndex, SearchText};

use super::draw;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Results,
}

/// What the content pane currently shows: the filtered listing, or one
/// product resolved from the detail endpoint.
pub enum View {
    List,
    Detail { product: Product, scroll: usize },
}

pub struct App<'a> {
    client: &'a CatalogClient,
    config: &'a Config,
    /// Full catalog, in API order. Never mutated after the initial fetch.
    products: Vec<Product>,
    /// Comparison forms of each product, parallel to `products`. Built
    /// once so a keystroke only normalizes the query.
    index: Vec<ProductIndex>,
    /// Indices into `products` for the rows surviving the current query,
    /// in original order.
    pub filtered: Vec<usize>,
    pub selected: usize,
    pub search_input: Input,
    pub search_focus: SearchFocus,
    pub view: View,
    pub status: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(client: &'a CatalogClient, config: &'a Config) -> Result<Self> {
        let products = client.fetch_products()?;
        let index = products.iter().map(ProductIndex::new).collect();
        let filtered = (0..products.len()).collect();
        Ok(Self {
            client,
            config,
            products,
            index,
            filtered,
            selected: 0,
            search_input: Input::default(),
            search_focus: SearchFocus::Input,
            view: View::List,
            status: None,
        })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn catalog_origin(&self) -> &str {
        self.client.base_url()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn filtered_products(&self) -> impl Iterator<Item = &Product> {
        self.filtered.iter().map(|&i| &self.products[i])
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.filtered.get(self.selected).map(|&i| &self.products[i])
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            draw::render(terminal, self)?;

            if event::poll(Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Ctrl+C always quits (hardcoded for safety)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Ok(true);
        }

        self.status = None;

        if matches!(self.view, View::Detail { .. }) {
            return self.handle_detail_key(key);
        }

        match self.search_focus {
            SearchFocus::Input => self.handle_search_input_key(key),
            SearchFocus::Results => self.handle_search_results_key(key),
        }
    }

    fn handle_search_input_key(&mut self, key: KeyEvent) -> Result<bool> {
        let input_keys = &self.config.keys.search_input;

        // Cancel: move focus to the result list without clearing the query
        if self.key_matches_any(&key, &input_keys.cancel) {
            self.search_focus = SearchFocus::Results;
            return Ok(false);
        }

        if self.key_matches_any(&key, &input_keys.confirm) {
            self.open_detail();
            return Ok(false);
        }

        // Next/prev: navigate results while typing
        if self.key_matches_any(&key, &input_keys.next) {
            self.move_selection(1);
            return Ok(false);
        }
        if self.key_matches_any(&key, &input_keys.prev) {
            self.move_selection(-1);
            return Ok(false);
        }

        // Pass other keys to the input widget; re-filter on value change
        if let Some(change) = self.search_input.handle_event(&Event::Key(key)) {
            if change.value {
                self.refresh_filter();
            }
        }
        Ok(false)
    }

    fn handle_search_results_key(&mut self, key: KeyEvent) -> Result<bool> {
        let results_keys = &self.config.keys.search_results;
        let global_keys = &self.config.keys.global;

        if self.key_matches_any(&key, &global_keys.quit) {
            return Ok(true);
        }
        if self.key_matches_any(&key, &global_keys.search)
            || self.key_matches_any(&key, &results_keys.cancel)
        {
            self.search_focus = SearchFocus::Input;
            return Ok(false);
        }
        if self.key_matches_any(&key, &results_keys.confirm) {
            self.open_detail();
            return Ok(false);
        }
        if self.key_matches_any(&key, &results_keys.next) {
            self.move_selection(1);
            return Ok(false);
        }
        if self.key_matches_any(&key, &results_keys.prev) {
            self.move_selection(-1);
            return Ok(false);
        }
        if self.key_matches_any(&key, &results_keys.page_down) {
            self.move_selection(10);
            return Ok(false);
        }
        if self.key_matches_any(&key, &results_keys.page_up) {
            self.move_selection(-10);
            return Ok(false);
        }
        Ok(false)
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<bool> {
        let detail_keys = &self.config.keys.detail;
        let global_keys = &self.config.keys.global;

        if self.key_matches_any(&key, &global_keys.quit) {
            return Ok(true);
        }
        if self.key_matches_any(&key, &detail_keys.back) {
            self.view = View::List;
            return Ok(false);
        }
        if self.key_matches_any(&key, &detail_keys.next) {
            if let View::Detail { scroll, .. } = &mut self.view {
                *scroll = scroll.saturating_add(1);
            }
            return Ok(false);
        }
        if self.key_matches_any(&key, &detail_keys.prev) {
            if let View::Detail { scroll, .. } = &mut self.view {
                *scroll = scroll.saturating_sub(1);
            }
            return Ok(false);
        }
        Ok(false)
    }

    /// Resolve the selected product through the detail endpoint and switch
    /// to the detail view. On failure, stay on the list with a status
    /// message; navigating back is the recovery action.
    fn open_detail(&mut self) {
        let Some(id) = self.selected_product().map(|p| p.id) else {
            self.status = Some("Nothing selected".to_string());
            return;
        };
        match self.client.fetch_product(id) {
            Ok(product) => {
                self.view = View::Detail { product, scroll: 0 };
            }
            Err(CatalogError::NotFound) => {
                self.status = Some(format!("Product {} not found", id));
            }
            Err(err) => {
                self.status = Some(format!("Fetch failed: {}", err));
            }
        }
    }

    /// Re-run the matcher over the full catalog. The filter is stable:
    /// survivors keep their original relative order. Selection follows the
    /// previously selected product when it survives.
    fn refresh_filter(&mut self) {
        let previous_id = self.selected_product().map(|p| p.id);

        let query = SearchText::new(self.search_input.value());
        self.filtered = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, idx)| idx.matches(&query))
            .map(|(i, _)| i)
            .collect();

        if let Some(id) = previous_id {
            if let Some(pos) = self
                .filtered
                .iter()
                .position(|&i| self.products[i].id == id)
            {
                self.selected = pos;
            }
        }

        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
    }

    fn move_selection(&mut self, delta: i64) {
        if self.filtered.is_empty() {
            return;
        }
        let last = (self.filtered.len() - 1) as i64;
        let next = (self.selected as i64 + delta).clamp(0, last);
        self.selected = next as usize;
    }

    fn key_matches_any(&self, event: &KeyEvent, bindings: &[String]) -> bool {
        bindings.iter().any(|b| key_matches_single(event, b))
    }
}

/// Check if the key event matches a single binding string
fn key_matches_single(event: &KeyEvent, binding: &str) -> bool {
    let trimmed = binding.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Disallow Ctrl/Alt/Super modifiers (we don't support them)
    let disallowed = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER;
    if event.modifiers.intersects(disallowed) {
        return false;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        // Special keys
        "enter" => matches!(event.code, KeyCode::Enter),
        "tab" => matches!(event.code, KeyCode::Tab),
        "backtab" | "shift+tab" => matches!(event.code, KeyCode::BackTab),
        "backspace" => matches!(event.code, KeyCode::Backspace),
        "esc" | "escape" => matches!(event.code, KeyCode::Esc),
        "space" => matches!(event.code, KeyCode::Char(' ')),
        // Arrow keys
        "up" => matches!(event.code, KeyCode::Up),
        "down" => matches!(event.code, KeyCode::Down),
        "left" => matches!(event.code, KeyCode::Left),
        "right" => matches!(event.code, KeyCode::Right),
        // Page navigation
        "pageup" | "page_up" => matches!(event.code, KeyCode::PageUp),
        "pagedown" | "page_down" => matches!(event.code, KeyCode::PageDown),
        "home" => matches!(event.code, KeyCode::Home),
        "end" => matches!(event.code, KeyCode::End),
        // Single character - case-sensitive (m != M, since M requires Shift)
        _ => {
            let mut chars = trimmed.chars();
            if let (Some(first), None) = (chars.next(), chars.next()) {
                matches!(event.code, KeyCode::Char(c) if c == first)
            } else {
                false
            }
        }
    }
}
