//! User-facing text (Russian).

pub const APP_TITLE: &str = "Обработчик CSV-файлов и Статистические тесты";
pub const UPLOAD_PROMPT: &str = "Загрузите CSV-файл";
pub const BROWSE_BUTTON: &str = "📂 Обзор";
pub const NO_FILE: &str = "Файл не выбран";
pub const LOAD_SUCCESS: &str = "Файл успешно загружен!";
pub const PARSE_ERROR: &str = "Ошибка: Неверный формат CSV-файла. Загрузите действительный CSV-файл.";
pub const IMPUTE_ERROR: &str = "Ошибка: Не удалось заполнить пропуски в данных.";
pub const NOT_ENOUGH_COLUMNS: &str = "Для анализа нужно минимум два столбца.";

pub const COLUMN_SECTION: &str = "Выбор столбцов";
pub const FIRST_COLUMN: &str = "Выберите первый столбец";
pub const SECOND_COLUMN: &str = "Выберите второй столбец";
pub const CHARTS_SECTION: &str = "Графики распределения";
pub const EMPTY_CHART: &str = "Нет данных для графика";

pub const ALPHA_LABEL: &str = "Выберите значение альфа:";
pub const METHOD_LABEL: &str = "Выберите метод статистической проверки:";
pub const METHOD_PLACEHOLDER: &str = "Выберите метод";
pub const VARIANT_LABEL: &str = "Вариант T-теста:";
pub const RESULTS_SECTION: &str = "Результаты статистической проверки";
pub const COPY_JSON: &str = "📋 Копировать JSON";

pub const CHI_SQUARE_HEADER: &str = "Результаты Chi-Square теста:";
pub const CHI_SQUARE_SIGNIFICANT: &str = "Связь между переменными статистически значима";
pub const CHI_SQUARE_NOT_SIGNIFICANT: &str = "Связь между переменными статистически не значима";
pub const CONTINGENCY_TABLE: &str = "Таблица сопряжённости";

pub const T_TEST_HEADER: &str = "Результаты T-Testа:";
pub const T_TEST_SIGNIFICANT: &str = "Различия между переменными статистически значимы";
pub const T_TEST_NOT_SIGNIFICANT: &str = "Различия между переменными статистически не значимы";

pub fn selected_columns(first: &str, second: &str) -> String {
    format!("Выбранные столбцы: {first}, {second}")
}

pub fn selected_alpha(alpha: f64) -> String {
    format!("Выбранное значение альфа: {alpha:.2}")
}

pub fn distribution_title(column: &str) -> String {
    format!("Распределение {column}")
}

pub fn loaded_summary(rows: usize, columns: usize) -> String {
    format!("{LOAD_SUCCESS} Строк: {rows}, столбцов: {columns}")
}

pub fn imputed_summary(column: &str, filled: usize, median: f64) -> String {
    format!("Пропуски в «{column}» ({filled}) заполнены медианой {median}")
}
