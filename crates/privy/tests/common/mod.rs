//! Shared fixture types with hand-written accessor tables

#![allow(dead_code)]

use parking_lot::{const_mutex, Mutex};
use privy::{AccessError, Lazy, ParamType, TypeBuilder, TypeInfo, Typed, Visibility};

static INSTANCES: Mutex<u64> = const_mutex(0);
static DEFAULT_LABEL: Mutex<String> = const_mutex(String::new());
static SEED: Mutex<i64> = const_mutex(7);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CounterError {
    #[error("counter rejected: {0}")]
    Rejected(String),
    #[error("label must not be empty")]
    EmptyLabel,
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: i32,
    pub label: String,
    history: Vec<i32>,
    secret: Option<String>,
}

impl Counter {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    fn add(&mut self, n: i32) -> i32 {
        self.history.push(n);
        self.count += n;
        self.count
    }
}

impl Typed for Counter {
    fn type_info() -> &'static TypeInfo {
        static INFO: Lazy<TypeInfo> = Lazy::new(|| {
            TypeBuilder::<Counter>::new("Counter")
                .field("_count", Visibility::Private, |c| &c.count, |c| &mut c.count)
                .field("_history", Visibility::Protected, |c| &c.history, |c| &mut c.history)
                .field("label", Visibility::Public, |c| &c.label, |c| &mut c.label)
                .property_rw(
                    "Label",
                    Visibility::Public,
                    |c| c.label.clone(),
                    |c, label: String| {
                        if label.is_empty() {
                            return Err(AccessError::thrown(CounterError::EmptyLabel));
                        }
                        c.label = label;
                        Ok(())
                    },
                )
                .property("Doubled", Visibility::Private, |c| c.count * 2)
                .property_set_only("Secret", Visibility::Internal, |c, secret: String| {
                    c.secret = Some(secret);
                    Ok(())
                })
                .method("reset", Visibility::Private, 0, |c, _| {
                    c.count = 0;
                    c.history.clear();
                    Ok(())
                })
                .function("add", Visibility::Private, 1, |c, args| {
                    let n = args.take::<i32>(0)?;
                    Ok(c.add(n))
                })
                .function("describe", Visibility::Protected, 0, |c, _| {
                    Ok(format!("{}={}", c.label, c.count))
                })
                .method("fail", Visibility::Private, 1, |_, args| {
                    let reason = args.take::<String>(0)?;
                    Err(AccessError::thrown(CounterError::Rejected(reason)))
                })
                .function("peek", Visibility::Public, 0, |c, _| Ok(c.count))
                .static_field(
                    "s_instances",
                    Visibility::Private,
                    || *INSTANCES.lock(),
                    |v| *INSTANCES.lock() = v,
                )
                .static_field(
                    "s_default_label",
                    Visibility::Private,
                    || DEFAULT_LABEL.lock().clone(),
                    |v| *DEFAULT_LABEL.lock() = v,
                )
                .static_field("s_seed", Visibility::Internal, || *SEED.lock(), |v| *SEED.lock() = v)
                .constant("MAX_COUNT", Visibility::Private, 1000i32)
                .constant("VERSION", Visibility::Public, "1.0")
                .static_function("scale", Visibility::Private, 2, |args| {
                    let value = args.take::<i32>(0)?;
                    let factor = args.take::<i32>(1)?;
                    Ok(value * factor)
                })
                .static_method("register", Visibility::Private, 0, |_| {
                    *INSTANCES.lock() += 1;
                    Ok(())
                })
                .static_method("explode", Visibility::Private, 0, |_| {
                    Err(AccessError::thrown(CounterError::Rejected("static".to_string())))
                })
                .static_function("version", Visibility::Public, 0, |_| Ok(2u32))
                .constructor(Visibility::Public, vec![], |_| Ok(Counter::default()))
                .constructor(Visibility::Private, vec![ParamType::of::<i32>()], |args| {
                    Ok(Counter {
                        count: args.take::<i32>(0)?,
                        ..Counter::default()
                    })
                })
                .constructor(
                    Visibility::Private,
                    vec![ParamType::of::<i32>(), ParamType::of::<String>()],
                    |args| {
                        Ok(Counter {
                            count: args.take::<i32>(0)?,
                            label: args.take::<String>(1)?,
                            ..Counter::default()
                        })
                    },
                )
                .constructor(Visibility::Private, vec![ParamType::of::<bool>()], |_| {
                    Err(AccessError::thrown(CounterError::Rejected("ctor".to_string())))
                })
                .build()
        });
        &INFO
    }
}

#[derive(Debug, Clone, Default)]
pub struct Shape {
    id: u32,
    name: String,
}

impl Shape {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl Typed for Shape {
    fn type_info() -> &'static TypeInfo {
        static INFO: Lazy<TypeInfo> = Lazy::new(|| {
            TypeBuilder::<Shape>::new("Shape")
                .field("_id", Visibility::Private, |s| &s.id, |s| &mut s.id)
                .field("_name", Visibility::Protected, |s| &s.name, |s| &mut s.name)
                .property_rw(
                    "Name",
                    Visibility::Protected,
                    |s| s.name.clone(),
                    |s, name: String| {
                        s.name = name;
                        Ok(())
                    },
                )
                .property("Id", Visibility::Private, |s| s.id)
                .function("describe", Visibility::Protected, 0, |s, _| {
                    Ok(format!("#{} {}", s.id, s.name))
                })
                .method("renumber", Visibility::Private, 1, |s, args| {
                    s.id = args.take::<u32>(0)?;
                    Ok(())
                })
                .build()
        });
        &INFO
    }
}

#[derive(Debug, Clone, Default)]
pub struct Circle {
    shape: Shape,
    radius: f64,
}

impl Circle {
    pub fn new(id: u32, radius: f64) -> Self {
        Self {
            shape: Shape::new(id, "circle"),
            radius,
        }
    }
}

impl Typed for Circle {
    fn type_info() -> &'static TypeInfo {
        static INFO: Lazy<TypeInfo> = Lazy::new(|| {
            TypeBuilder::<Circle>::new("Circle")
                .base::<Shape, _, _>(|c| &c.shape, |c| &mut c.shape)
                .field("_radius", Visibility::Private, |c| &c.radius, |c| &mut c.radius)
                .build()
        });
        &INFO
    }
}

#[derive(Debug, Clone, Default)]
pub struct Badge {
    circle: Circle,
    text: String,
}

impl Badge {
    pub fn new(id: u32, text: &str) -> Self {
        Self {
            circle: Circle::new(id, 1.0),
            text: text.to_string(),
        }
    }
}

impl Typed for Badge {
    fn type_info() -> &'static TypeInfo {
        static INFO: Lazy<TypeInfo> = Lazy::new(|| {
            TypeBuilder::<Badge>::new("Badge")
                .base::<Circle, _, _>(|b| &b.circle, |b| &mut b.circle)
                .field("_text", Visibility::Private, |b| &b.text, |b| &mut b.text)
                .build()
        });
        &INFO
    }
}
