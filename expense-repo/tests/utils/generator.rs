use chrono::{DateTime, TimeZone, Utc};
use expense_repo::expense_repo::{NewExpense, Source};
use fake::faker::company::en::CompanyName;
use fake::{Fake, Faker};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;

pub trait Generator<T> {
    fn gen(&mut self) -> T;
}

pub struct Predefined<T> {
    values: Vec<T>,
    current_pos: usize,
}

impl<T> Predefined<T> {
    pub fn boxed(values: Vec<T>) -> Box<Predefined<T>> {
        Box::new(Predefined {
            values,
            current_pos: 0,
        })
    }
}

impl<T: Clone> Generator<T> for Predefined<T> {
    fn gen(&mut self) -> T {
        let v = self.values[self.current_pos % self.values.len()].clone();
        self.current_pos += 1;
        v
    }
}

pub struct RandomSample<T> {
    values: Vec<T>,
}

impl<T> RandomSample<T> {
    pub fn boxed(values: Vec<T>) -> Box<RandomSample<T>> {
        Box::new(RandomSample { values })
    }
}

impl<T: Clone> Generator<T> for RandomSample<T> {
    fn gen(&mut self) -> T {
        self.values.choose(&mut rand::thread_rng()).unwrap().clone()
    }
}

struct FakeMerchant;

impl Generator<Option<String>> for FakeMerchant {
    fn gen(&mut self) -> Option<String> {
        if Faker.fake::<bool>() {
            Some(CompanyName().fake())
        } else {
            None
        }
    }
}

/// Whole seconds between 2020 and 2025.
struct FakeDate;

impl Generator<Option<DateTime<Utc>>> for FakeDate {
    fn gen(&mut self) -> Option<DateTime<Utc>> {
        let seconds: i64 = (1_577_836_800_i64..1_735_689_600_i64).fake();
        Utc.timestamp_opt(seconds, 0).single()
    }
}

/// Positive amounts with at most two fractional digits.
struct FakeAmount;

impl Generator<Decimal> for FakeAmount {
    fn gen(&mut self) -> Decimal {
        Decimal::new((1_i64..1_000_000).fake::<i64>(), 2)
    }
}

#[allow(dead_code)]
pub struct NewExpenseGenerator {
    amnt_gen: Box<dyn Generator<Decimal>>,
    cat_gen: Box<dyn Generator<String>>,
    merch_gen: Box<dyn Generator<Option<String>>>,
    date_gen: Box<dyn Generator<Option<DateTime<Utc>>>>,
    src_gen: Box<dyn Generator<Source>>,
}

#[allow(dead_code)]
impl NewExpenseGenerator {
    pub fn with_categories(mut self, categories: Vec<&str>) -> NewExpenseGenerator {
        let categories = categories.into_iter().map(|s| s.to_string()).collect();
        self.cat_gen = Predefined::boxed(categories);
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> NewExpenseGenerator {
        self.src_gen = Predefined::boxed(sources);
        self
    }

    pub fn with_dates(mut self, dates: Vec<DateTime<Utc>>) -> NewExpenseGenerator {
        self.date_gen = Predefined::boxed(dates.into_iter().map(Some).collect());
        self
    }

    pub fn with_amounts(mut self, amounts: Vec<Decimal>) -> NewExpenseGenerator {
        self.amnt_gen = Predefined::boxed(amounts);
        self
    }

    pub fn generate(&mut self) -> NewExpense {
        NewExpense::new(
            self.amnt_gen.gen(),
            self.cat_gen.gen(),
            self.merch_gen.gen(),
            self.date_gen.gen(),
            self.src_gen.gen(),
        )
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<NewExpense> {
        let mut vec = Vec::with_capacity(count);
        for _ in 0..count {
            vec.push(self.generate())
        }
        vec
    }
}

impl Default for NewExpenseGenerator {
    fn default() -> Self {
        NewExpenseGenerator {
            amnt_gen: Box::new(FakeAmount),
            cat_gen: RandomSample::boxed(vec![
                "Food".to_string(),
                "Groceries".to_string(),
                "Transport".to_string(),
                "Rent".to_string(),
            ]),
            merch_gen: Box::new(FakeMerchant),
            date_gen: Box::new(FakeDate),
            src_gen: RandomSample::boxed(vec![Source::Manual, Source::Sms]),
        }
    }
}
