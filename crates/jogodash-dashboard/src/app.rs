//! Dashboard state and input handling

use crossterm::event::KeyCode;
use jogodash_config::DisplayConfig;
use jogodash_library::{
    Catalog, CatalogCache, CatalogSource, DISTRIBUTION_LIMIT, DisplayMode, FilterOutcome,
    GenreDistribution, LibraryError, Summary, filter_games,
};
use ratatui::widgets::ListState;
use std::rc::Rc;
use tracing::{debug, info};

/// Range of the minimum rating control
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

pub const NO_GAMES_NOTICE: &str = "Nenhum jogo encontrado com os filtros selecionados.";
pub const NO_DISTRIBUTION_NOTICE: &str = "Não há dados suficientes para gerar o gráfico de pizza.";

/// Everything derived from the current filter parameters
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub outcome: FilterOutcome,
    pub summary: Summary,
    pub distribution: GenreDistribution,
}

impl DashboardView {
    fn compute(catalog: &Catalog, genre: Option<&str>, min_rating: f64, mode: DisplayMode) -> Self {
        let outcome = match genre {
            Some(genre) => filter_games(catalog.games(), genre, min_rating, mode),
            None => FilterOutcome::empty(mode),
        };
        let summary = Summary::of(&outcome.games);
        let distribution = GenreDistribution::from_games(&outcome.games, DISTRIBUTION_LIMIT);

        Self {
            outcome,
            summary,
            distribution,
        }
    }

    /// Informational line for a Top 10 request that matched too few games
    pub fn shortfall_notice(&self) -> Option<String> {
        (self.outcome.mode == DisplayMode::Top10 && self.outcome.short_of_limit).then(|| {
            format!(
                "⚠️ Apenas {} jogos encontrados com esses critérios.",
                self.outcome.len()
            )
        })
    }
}

/// Application state
pub struct App<S> {
    cache: CatalogCache<S>,
    catalog: Rc<Catalog>,

    /// Distinct genres of the catalog, sorted
    pub genres: Vec<String>,
    pub genre_state: ListState,

    pub min_rating: f64,
    rating_step: f64,
    pub mode: DisplayMode,

    pub view: DashboardView,

    pub title: String,
    pub status: String,
    pub should_quit: bool,
}

impl<S: CatalogSource> App<S> {
    /// Load the catalog through `cache` and apply the configured defaults
    pub fn new(cache: CatalogCache<S>, display: &DisplayConfig) -> Result<Self, LibraryError> {
        let catalog = cache.get()?;
        let genres = catalog.genres();
        let min_rating = display.default_min_rating;
        let mode = DisplayMode::default();

        let mut genre_state = ListState::default();
        if !genres.is_empty() {
            genre_state.select(Some(0));
        }

        let view = DashboardView::compute(&catalog, genres.first().map(String::as_str), min_rating, mode);

        let status = load_status(&catalog);

        Ok(Self {
            cache,
            catalog,
            genres,
            genre_state,
            min_rating,
            rating_step: display.rating_step,
            mode,
            view,
            title: display.title.clone(),
            status,
            should_quit: false,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected_genre(&self) -> Option<&str> {
        self.genre_state
            .selected()
            .and_then(|i| self.genres.get(i))
            .map(String::as_str)
    }

    /// Handle a key press
    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_genre(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_genre(),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_min_rating(-self.rating_step),
            KeyCode::Right | KeyCode::Char('+') => self.adjust_min_rating(self.rating_step),
            KeyCode::Tab | KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn select_prev_genre(&mut self) {
        if self.genres.is_empty() {
            return;
        }

        let i = match self.genre_state.selected() {
            Some(0) | None => self.genres.len() - 1,
            Some(i) => i - 1,
        };
        self.genre_state.select(Some(i));
        self.refresh();
    }

    fn select_next_genre(&mut self) {
        if self.genres.is_empty() {
            return;
        }

        let i = match self.genre_state.selected() {
            Some(i) if i + 1 < self.genres.len() => i + 1,
            _ => 0,
        };
        self.genre_state.select(Some(i));
        self.refresh();
    }

    fn adjust_min_rating(&mut self, delta: f64) {
        let next = self.min_rating + delta;
        // Snap to the step grid so repeated steps do not drift, then bound
        let snapped =
            ((next / self.rating_step).round() * self.rating_step).clamp(RATING_MIN, RATING_MAX);
        self.min_rating = (snapped * 1000.0).round() / 1000.0;
        self.refresh();
    }

    fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.refresh();
    }

    /// Re-run the filter for the current parameters
    fn refresh(&mut self) {
        let genre = self.selected_genre().map(str::to_string);
        self.view = DashboardView::compute(&self.catalog, genre.as_deref(), self.min_rating, self.mode);
        debug!(
            genre = ?genre,
            min_rating = self.min_rating,
            mode = ?self.mode,
            matched = self.view.outcome.len(),
            "filter recomputed"
        );
    }

    /// Query the store again, keeping the current data if that fails
    fn reload(&mut self) {
        match self.cache.reload() {
            Ok(catalog) => {
                let previous = self.selected_genre().map(str::to_string);
                self.catalog = catalog;
                self.genres = self.catalog.genres();

                let index = previous
                    .and_then(|g| self.genres.iter().position(|x| *x == g))
                    .or(if self.genres.is_empty() { None } else { Some(0) });
                self.genre_state.select(index);

                self.status = load_status(&self.catalog);
                info!("Catalog reloaded: {}", self.status);
                self.refresh();
            }
            Err(e) => {
                self.status = format!("Erro ao recarregar: {}", e);
            }
        }
    }
}

fn load_status(catalog: &Catalog) -> String {
    let report = catalog.report();
    if report.is_clean() {
        format!("{} jogos carregados", report.rows)
    } else {
        format!(
            "{} jogos carregados, {} com dados incompletos",
            report.rows, report.degraded_rows
        )
    }
}
