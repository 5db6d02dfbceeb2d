use async_trait::async_trait;
use car_rental::{
    BookingError, CarRentalCompany, CarType, CompanyRegistry, Quote, RemoteError, Reservation,
    ReservationConstraints,
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

// Company that answers everything from constants, so only the registry is measured
struct FixedCompany {
    name: String,
}

#[async_trait]
impl CarRentalCompany for FixedCompany {
    async fn name(&self) -> Result<String, RemoteError> {
        Ok(self.name.clone())
    }

    async fn regions(&self) -> Result<Vec<String>, RemoteError> {
        Ok(vec![])
    }

    async fn has_region(&self, _region: &str) -> Result<bool, RemoteError> {
        Ok(false)
    }

    async fn all_car_types(&self) -> Result<Vec<CarType>, RemoteError> {
        Ok(vec![])
    }

    async fn car_type(&self, _name: &str) -> Result<Option<CarType>, RemoteError> {
        Ok(None)
    }

    async fn is_available(
        &self,
        _car_type: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<bool, RemoteError> {
        Ok(false)
    }

    async fn available_car_types(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<HashSet<CarType>, RemoteError> {
        Ok(HashSet::new())
    }

    async fn create_quote(
        &self,
        constraints: ReservationConstraints,
        client: &str,
    ) -> Result<Quote, BookingError> {
        Ok(Quote {
            client: client.to_string(),
            company: self.name.clone(),
            constraints,
        })
    }

    async fn confirm_quote(&self, quote: Quote) -> Result<Reservation, BookingError> {
        Ok(Reservation {
            reservation_id: "bench".to_string(),
            quote,
        })
    }

    async fn cancel_reservation(&self, _reservation: Reservation) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn reservations_by_renter(
        &self,
        _client: &str,
    ) -> Result<Vec<Reservation>, RemoteError> {
        Ok(vec![])
    }

    async fn number_of_reservations_for_car_type(
        &self,
        _car_type: &str,
    ) -> Result<usize, RemoteError> {
        Ok(0)
    }
}

pub fn registry_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("company_registry");

    // Benchmark with different numbers of bound companies
    for company_count in [1, 10, 100].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(company_count),
            company_count,
            |b, &company_count| {
                let names = (0..company_count)
                    .map(|i| format!("company{}", i))
                    .collect::<Vec<_>>();
                let registry = Arc::new(CompanyRegistry::new());
                for name in &names {
                    registry.rebind(name, Arc::new(FixedCompany { name: name.clone() }));
                }

                b.iter(|| {
                    // Spawn multiple threads to simulate concurrent clients
                    let mut handles = vec![];
                    for _ in 0..4 {
                        let registry = Arc::clone(&registry);
                        let names = names.clone();

                        let handle = thread::spawn(move || {
                            let mut rng = thread_rng();

                            for _ in 0..250 {
                                let name = names.choose(&mut rng).unwrap();

                                if rng.gen_bool(0.05) {
                                    // 5% rebinds
                                    registry.rebind(
                                        name,
                                        Arc::new(FixedCompany { name: name.clone() }),
                                    );
                                } else {
                                    // 95% lookups
                                    let _ = black_box(registry.lookup(name));
                                }
                            }
                        });

                        handles.push(handle);
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }

                    black_box(registry.names().len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, registry_benchmark);
criterion_main!(benches);
