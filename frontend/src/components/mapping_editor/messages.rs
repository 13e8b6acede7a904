use common::fetch::FetchOutcome;
use common::model::mapping::Side;

pub enum Msg {
    SelectDatasource(Side, String),
    TablesLoaded(FetchOutcome),
    RetryFetch(Side),
    SelectTable(Side, String),
    AddMapping,
    DeleteMapping(usize),
    SetStartTime(String),
    SetFrequency(String),
    SetFrequencyUnit(String),
    Confirm,
    Cancel,
}
