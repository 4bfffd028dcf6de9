use serde::Serialize;

use crate::filter::FilteredView;
use crate::store::TowerRecord;

pub const TYPE_PALETTE: [&str; 3] = ["#4CAF50", "#FF9800", "#2196F3"];
pub const CITY_COLOR: &str = "#2196F3";

/// Category counts in first-seen order. Categories absent from the view do not appear.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub categories: Vec<(String, usize)>,
}

impl Distribution {
    pub fn tally<'a, I, F>(records: I, key: F) -> Self
    where
        I: IntoIterator<Item = &'a TowerRecord>,
        F: Fn(&TowerRecord) -> &str,
    {
        let mut categories: Vec<(String, usize)> = Vec::new();
        for r in records {
            let k = key(r);
            match categories.iter_mut().find(|(label, _)| label == k) {
                Some((_, n)) => *n += 1,
                None => categories.push((k.to_string(), 1)),
            }
        }
        Self { categories }
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    TypeDistribution,
    CityDistribution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub colors: Vec<String>,
}

impl ChartSpec {
    fn type_distribution(dist: &Distribution) -> Self {
        let (labels, values): (Vec<String>, Vec<usize>) = dist.categories.iter().cloned().unzip();
        let colors = (0..labels.len())
            .map(|i| TYPE_PALETTE[i % TYPE_PALETTE.len()].to_string())
            .collect();
        Self {
            slot: ChartSlot::TypeDistribution,
            kind: ChartKind::Pie,
            title: "Towers by Type".to_string(),
            labels,
            values,
            colors,
        }
    }

    fn city_distribution(dist: &Distribution) -> Self {
        let (labels, values): (Vec<String>, Vec<usize>) = dist.categories.iter().cloned().unzip();
        Self {
            slot: ChartSlot::CityDistribution,
            kind: ChartKind::Bar,
            title: "Towers by City".to_string(),
            labels,
            values,
            colors: vec![CITY_COLOR.to_string()],
        }
    }
}

/// Charting collaborator. A handle is consumed by `destroy`, so a destroyed instance
/// cannot be reused.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, spec: ChartSpec) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

/// Owns at most one live chart per slot. Each render destroys the slot's current
/// instance before creating its replacement.
pub struct ChartRenderer<B: ChartBackend> {
    backend: B,
    type_chart: Option<B::Handle>,
    city_chart: Option<B::Handle>,
}

impl<B: ChartBackend> ChartRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            type_chart: None,
            city_chart: None,
        }
    }

    pub fn render(&mut self, view: &FilteredView<'_>) {
        let by_type = Distribution::tally(view, |r| r.tower_type.label());
        let by_city = Distribution::tally(view, |r| r.city.as_str());

        if let Some(old) = self.type_chart.take() {
            self.backend.destroy(old);
        }
        self.type_chart = Some(self.backend.create(ChartSpec::type_distribution(&by_type)));

        if let Some(old) = self.city_chart.take() {
            self.backend.destroy(old);
        }
        self.city_chart = Some(self.backend.create(ChartSpec::city_distribution(&by_city)));
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for ChartRenderer<B> {
    fn drop(&mut self) {
        for handle in [self.type_chart.take(), self.city_chart.take()].into_iter().flatten() {
            self.backend.destroy(handle);
        }
    }
}
