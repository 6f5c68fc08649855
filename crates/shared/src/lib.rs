use serde::{Deserialize, Serialize};

pub mod parameters;

pub use parameters::{Parameter, ParameterError, ParameterResult, ParameterValues, Parameters};

/// Числовой атрибут: литерал или формула над параметрами сборки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(f64),
    Formula(String),
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Dimension::Number(value)
    }
}

impl From<&str> for Dimension {
    fn from(expression: &str) -> Self {
        Dimension::Formula(expression.to_string())
    }
}

/// Подрезка с каждой стороны элемента
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub front: f64,
    pub back: f64,
}

impl Offset {
    /// Суммарная подрезка по X (left + right)
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Суммарная подрезка по Y (top + bottom)
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Суммарная подрезка вдоль оси сборки (front + back)
    pub fn depth(&self) -> f64 {
        self.front + self.back
    }
}

/// Визуальное описание материала
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Путь к текстуре относительно корня текстур
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Цвет в hex, например `#c8a165`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Тип элемента
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Сплошной лист на всю площадь покрытия
    #[default]
    Sheet,
    /// Сетка повторяющихся модулей (кирпич, черепица, панели)
    Unit,
    /// Каркас; геометрия пока не строится
    Frame,
    /// Воздушный зазор: занимает слот без геометрии
    Void,
    /// Неизвестный тип
    #[serde(untagged)]
    Unsupported(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Sheet => "sheet",
            ElementKind::Unit => "unit",
            ElementKind::Frame => "frame",
            ElementKind::Void => "void",
            ElementKind::Unsupported(tag) => tag,
        }
    }
}

/// Слой материала в том виде, как он записан в модели; все поля необязательны
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
}

impl ElementSpec {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_thickness(mut self, thickness: impl Into<Dimension>) -> Self {
        self.thickness = Some(thickness.into());
        self
    }

    pub fn with_size(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Один слот стека сборки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Layer {
    /// Параллельные подсборки в одном слоте (стойки + утеплитель)
    Composite(Vec<Layer>),
    Element(ElementSpec),
}

impl From<ElementSpec> for Layer {
    fn from(element: ElementSpec) -> Self {
        Layer::Element(element)
    }
}

/// Значения по умолчанию для незаданных полей элементов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Высота площади покрытия
    pub height: Dimension,
    /// Ширина площади покрытия
    pub width: Dimension,
    pub thickness: Dimension,
    pub color: String,
    pub opacity: f64,
    pub material: Option<MaterialSpec>,
    pub transparency: bool,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub offset: Offset,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            height: Dimension::Number(500.0),
            width: Dimension::Number(500.0),
            thickness: Dimension::Number(10.0),
            color: "#cccccc".to_string(),
            opacity: 1.0,
            material: None,
            transparency: false,
            kind: ElementKind::Sheet,
            offset: Offset::default(),
        }
    }
}

/// Документ сборки: параметры, значения по умолчанию и стек слоёв
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssemblyFile {
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
    #[serde(default)]
    pub defaults: Defaults,
    pub layers: Vec<Layer>,
}
