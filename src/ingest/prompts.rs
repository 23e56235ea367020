//! 发给模型的 prompt（西班牙语，与前端一致）

use std::fmt;
use std::str::FromStr;

use crate::core::IngestError;
use crate::curriculum::GradePlan;

/// 按字符数截断（不会切断 UTF-8 字符）
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// GradePlan 的 JSON Schema，嵌入 prompt 约束输出结构
pub fn grade_plan_schema() -> String {
    let schema = schemars::schema_for!(GradePlan);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// 课程导入 prompt：PDF 提取出的文本 → 一个或多个 GradePlan
pub fn curriculum_prompt(pdf_text: &str, max_chars: usize) -> String {
    format!(
        r#"Actúa como un experto en educación y planificación curricular. Analiza el siguiente texto extraído de un PDF de planificación escolar y genera un JSON estructurado.

TEXTO DEL PDF:
"{text}"

OBJETIVO:
Extraer el plan de estudios completo, incluyendo rangos de fechas EXACTOS para cada semana y el horario de clases. Si el PDF contiene múltiples grados (ej: 2º, 3º, 4º), genera un ARRAY de objetos JSON, uno por cada grado. Si es un solo grado, genera un solo objeto.

ESQUEMA JSON DE CADA GRADO:
{schema}

REGLAS CRÍTICAS:
1. VALID JSON: Asegúrate de que el JSON sea perfectamente válido. Escapa las comillas dobles dentro de los valores. Sin comentarios.
2. FECHAS: Genera un "dateRange" con formato "YYYY-MM-DD to YYYY-MM-DD" para CADA semana. Si el PDF no tiene año, asume el ciclo escolar actual.
3. HORARIO: El campo "schedule" es OBLIGATORIO, con claves "Monday" a "Friday". NO dejes días vacíos.
4. Devuelve SOLO el JSON."#,
        text = truncate_chars(pdf_text, max_chars),
        schema = grade_plan_schema(),
    )
}

/// 学生名单 prompt：表格行（JSON）→ {"2A": [...], ...}
pub fn roster_prompt(rows_json: &str, max_chars: usize) -> String {
    format!(
        r#"Actúa como un experto en procesamiento de datos. Analiza el siguiente array de datos JSON que proviene de un archivo Excel con una lista de alumnos.

Datos:
{rows}

Tu tarea es extraer los nombres de los alumnos y organizarlos por grado y grupo.
Identifica columnas que parezcan nombres (ej: "Nombre", "Alumno", "Name"), grados (ej: "Grado", "Grade", "2") y grupos (ej: "Grupo", "A", "B").
Si no encuentras grado/grupo explícito, trata de inferirlo o agrúpalos en "General".

Devuelve un JSON con esta estructura EXACTA:
{{
  "2A": ["Nombre Alumno 1", "Nombre Alumno 2"],
  "2B": ["Nombre Alumno 3"]
}}

Usa claves como "2A", "3B", "4A", etc. Normaliza los nombres (Capitalize).
Solo devuelve el JSON válido."#,
        rows = truncate_chars(rows_json, max_chars),
    )
}

/// 文本辅助动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    Summarize,
    Correct,
    Expand,
}

impl FromStr for TextAction {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summarize" => Ok(TextAction::Summarize),
            "correct" => Ok(TextAction::Correct),
            "expand" => Ok(TextAction::Expand),
            other => Err(IngestError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for TextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextAction::Summarize => "summarize",
            TextAction::Correct => "correct",
            TextAction::Expand => "expand",
        };
        f.write_str(name)
    }
}

pub fn text_prompt(action: TextAction, text: &str) -> String {
    match action {
        TextAction::Summarize => format!(
            "Actúa como un asistente educativo. Resume el siguiente texto de manera concisa y clara:\n\n\"{text}\""
        ),
        TextAction::Correct => format!(
            "Actúa como un editor profesional. Corrige la ortografía y gramática del siguiente texto, manteniendo el tono original:\n\n\"{text}\""
        ),
        TextAction::Expand => format!(
            "Actúa como un asistente creativo. Expande las siguientes ideas con detalles relevantes y sugerencias prácticas para un contexto educativo:\n\n\"{text}\""
        ),
    }
}
